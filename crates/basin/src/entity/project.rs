//! Project entity - the parent container for all tracker-side records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::sync_state::SyncState;

/// A tracked issue-tracker project.
///
/// Created once during the Metadata step of a tracker sync; afterwards only
/// its sync status and last-synced timestamp are mutated. Resolved by the
/// `key` natural key (e.g. `ENG`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Upstream-assigned identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Short project key, unique per tracker instance.
    #[sea_orm(unique)]
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub status: SyncState,
    pub last_synced_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::issue::Entity")]
    Issue,
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
    #[sea_orm(has_many = "super::issue_link::Entity")]
    IssueLink,
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issue.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::issue_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssueLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
