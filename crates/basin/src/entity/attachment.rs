//! Attachment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A file attached to a tracker issue. Immutable after insertion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    /// Upstream-assigned identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub issue_id: i64,
    pub filename: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub author: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::issue::Entity",
        from = "Column::IssueId",
        to = "super::issue::Column::Id"
    )]
    Issue,
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
