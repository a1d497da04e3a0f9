//! Workspace-side store operations: workspace lifecycle.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entity::prelude::*;
use crate::source::WorkspaceRecord;

use super::errors::{Result, StoreError};

/// Create the workspace row if absent, otherwise mark it in progress.
pub async fn ensure_workspace(
    db: &DatabaseConnection,
    record: &WorkspaceRecord,
) -> Result<WorkspaceModel> {
    if let Some(existing) = Workspace::find_by_id(&record.id).one(db).await? {
        let mut model: WorkspaceActiveModel = existing.into();
        model.status = Set(SyncState::InProgress);
        return Ok(model.update(db).await?);
    }

    let model = record.active_model(SyncState::InProgress);
    Ok(model.insert(db).await?)
}

/// Fetch a workspace by key, erroring if it is absent.
pub async fn get_workspace(db: &DatabaseConnection, id: &str) -> Result<WorkspaceModel> {
    Workspace::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("workspace {id}")))
}

/// Set a workspace back to `in_progress` for the duration of a run.
pub async fn mark_workspace_in_progress(db: &DatabaseConnection, id: &str) -> Result<()> {
    let workspace = get_workspace(db, id).await?;
    let mut model: WorkspaceActiveModel = workspace.into();
    model.status = Set(SyncState::InProgress);
    model.update(db).await?;
    Ok(())
}

/// Mark a workspace's sync as completed and stamp `last_synced_at`.
pub async fn complete_workspace(db: &DatabaseConnection, id: &str) -> Result<()> {
    let workspace = get_workspace(db, id).await?;
    let mut model: WorkspaceActiveModel = workspace.into();
    model.status = Set(SyncState::Completed);
    model.last_synced_at = Set(Some(Utc::now().fixed_offset()));
    model.update(db).await?;
    Ok(())
}

/// Mark a workspace's sync as failed.
pub async fn fail_workspace(db: &DatabaseConnection, id: &str) -> Result<()> {
    let workspace = get_workspace(db, id).await?;
    let mut model: WorkspaceActiveModel = workspace.into();
    model.status = Set(SyncState::Failed);
    model.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn get_workspace_errors_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results::<WorkspaceModel, _, _>([Vec::new()])
            .into_connection();

        let err = get_workspace(&db, "DOCS")
            .await
            .expect_err("should be missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
