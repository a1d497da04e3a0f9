//! Sync lifecycle state for parent entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a parent entity (repository, project, workspace) across
/// full-sync runs.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SyncState {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Pending => write!(f, "pending"),
            SyncState::InProgress => write!(f, "in_progress"),
            SyncState::Completed => write!(f, "completed"),
            SyncState::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_pending() {
        assert_eq!(SyncState::default(), SyncState::Pending);
    }

    #[test]
    fn display_outputs_expected_strings() {
        assert_eq!(SyncState::Pending.to_string(), "pending");
        assert_eq!(SyncState::InProgress.to_string(), "in_progress");
        assert_eq!(SyncState::Completed.to_string(), "completed");
        assert_eq!(SyncState::Failed.to_string(), "failed");
    }
}
