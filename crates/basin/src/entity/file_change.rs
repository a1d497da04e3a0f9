//! FileChange entity - per-file diff stats for a pull request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A changed file within a pull request.
///
/// The upstream files endpoint assigns no identifier, so the primary key is
/// synthesized as `"{pull_request_id}:{path}"`, which is stable across
/// re-fetches.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub pull_request_id: i64,
    pub path: String,
    /// Change status (added, modified, removed, renamed).
    pub status: String,
    pub additions: i32,
    pub deletions: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pull_request::Entity",
        from = "Column::PullRequestId",
        to = "super::pull_request::Column::Id"
    )]
    PullRequest,
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build the synthesized primary key for a pull request + path pair.
    pub fn change_key(pull_request_id: i64, path: &str) -> String {
        format!("{pull_request_id}:{path}")
    }
}
