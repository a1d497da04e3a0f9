//! Commit entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A commit on a tracked repository. Immutable after insertion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commits")]
pub struct Model {
    /// Commit SHA as assigned by the forge.
    #[sea_orm(primary_key, auto_increment = false)]
    pub sha: String,
    pub repository_id: i64,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub committed_at: Option<DateTimeWithTimeZone>,
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id"
    )]
    Repository,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
