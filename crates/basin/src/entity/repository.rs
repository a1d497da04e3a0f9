//! Repository entity - the parent container for all forge-side records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::sync_state::SyncState;

/// A tracked code-forge repository.
///
/// Created once during the Metadata step of a forge sync; afterwards only
/// its sync status and last-synced timestamp are mutated. The webhook
/// ingress resolves repositories by the `(owner, name)` natural key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Upstream-assigned identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    // ─── Naming ──────────────────────────────────────────────────────────────
    /// Owner login (user or organization).
    pub owner: String,
    /// Repository name (URL-safe slug).
    pub name: String,

    // ─── Content ─────────────────────────────────────────────────────────────
    /// Repository description.
    pub description: Option<String>,
    /// Default branch name.
    #[sea_orm(default_value = "main")]
    pub default_branch: String,

    // ─── Sync tracking ───────────────────────────────────────────────────────
    /// Current sync lifecycle state.
    pub status: SyncState,
    /// When the last full sync for this repository finished.
    pub last_synced_at: Option<DateTimeWithTimeZone>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    /// When the repository was created on the forge.
    pub created_at: Option<DateTimeWithTimeZone>,
    /// When the repository was last updated.
    pub updated_at: Option<DateTimeWithTimeZone>,
    /// When code was last pushed.
    pub pushed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::commit::Entity")]
    Commit,
    #[sea_orm(has_many = "super::pull_request::Entity")]
    PullRequest,
    #[sea_orm(has_many = "super::issue::Entity")]
    Issue,
}

impl Related<super::commit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commit.def()
    }
}

impl Related<super::pull_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PullRequest.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compute the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
