//! Issue entity - shared between the forge and the tracker.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An issue, either forge-side (owned by a repository) or tracker-side
/// (owned by a project). Exactly one of `repository_id` / `project_id` is
/// set; the unprocessed-children queries always filter by parent, so the
/// two pipelines never scan each other's rows.
///
/// The `processed_at` marker means "comments pulled" for forge issues and
/// "attachments pulled" for tracker issues.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    /// Upstream-assigned identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub repository_id: Option<i64>,
    pub project_id: Option<i64>,
    /// Repository-scoped sequence number (forge issues).
    pub number: Option<i32>,
    /// Human-readable key such as `ENG-204` (tracker issues).
    pub key: Option<String>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    pub state: String,
    pub author: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub processed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id"
    )]
    Repository,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachment,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
