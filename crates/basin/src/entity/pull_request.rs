//! PullRequest entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A pull request on a tracked repository.
///
/// Immutable after insertion except for webhook-driven metadata patches
/// (title, state, timestamps) and the `processed_at` marker, which records
/// that the child-fetch chain (comments, reviews, file changes) has
/// completed for this pull request at least once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pull_requests")]
pub struct Model {
    /// Upstream-assigned identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub repository_id: i64,
    /// Repository-scoped sequence number.
    pub number: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    /// Upstream state string (open, closed, merged).
    pub state: String,
    pub author: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub merged_at: Option<DateTimeWithTimeZone>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    /// Set once the child-fetch chain has succeeded; null means the
    /// secondary-sync steps still consider this pull request unprocessed.
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
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::file_change::Entity")]
    FileChange,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::file_change::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FileChange.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
