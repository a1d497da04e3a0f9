//! Tracker-side store operations: project lifecycle and unprocessed-issue
//! queries.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::prelude::*;
use crate::source::ProjectRecord;

use super::errors::{Result, StoreError};

/// Create the project row if absent, otherwise mark it in progress.
pub async fn ensure_project(
    db: &DatabaseConnection,
    record: &ProjectRecord,
) -> Result<ProjectModel> {
    if let Some(existing) = Project::find_by_id(record.id).one(db).await? {
        let mut model: ProjectActiveModel = existing.into();
        model.status = Set(SyncState::InProgress);
        return Ok(model.update(db).await?);
    }

    let model = record.active_model(SyncState::InProgress);
    Ok(model.insert(db).await?)
}

/// Resolve a project by its key.
pub async fn find_project_by_key(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<ProjectModel>> {
    Ok(Project::find()
        .filter(ProjectColumn::Key.eq(key))
        .one(db)
        .await?)
}

/// Fetch a project by id, erroring if it is absent.
pub async fn get_project(db: &DatabaseConnection, id: i64) -> Result<ProjectModel> {
    Project::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("project {id}")))
}

/// Set a project back to `in_progress` for the duration of a run.
pub async fn mark_project_in_progress(db: &DatabaseConnection, id: i64) -> Result<()> {
    set_project_status(db, id, SyncState::InProgress).await
}

/// Mark a project's sync as completed and stamp `last_synced_at`.
pub async fn complete_project(db: &DatabaseConnection, id: i64) -> Result<()> {
    let project = get_project(db, id).await?;
    let mut model: ProjectActiveModel = project.into();
    model.status = Set(SyncState::Completed);
    model.last_synced_at = Set(Some(Utc::now().fixed_offset()));
    model.update(db).await?;
    Ok(())
}

/// Mark a project's sync as failed.
pub async fn fail_project(db: &DatabaseConnection, id: i64) -> Result<()> {
    set_project_status(db, id, SyncState::Failed).await
}

async fn set_project_status(db: &DatabaseConnection, id: i64, status: SyncState) -> Result<()> {
    let project = get_project(db, id).await?;
    let mut model: ProjectActiveModel = project.into();
    model.status = Set(status);
    model.update(db).await?;
    Ok(())
}

/// Tracker issues whose attachments have not yet been pulled.
pub async fn unprocessed_issues(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<IssueModel>> {
    Ok(Issue::find()
        .filter(IssueColumn::ProjectId.eq(project_id))
        .filter(IssueColumn::ProcessedAt.is_null())
        .order_by_asc(IssueColumn::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_project_by_key_returns_none_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results::<ProjectModel, _, _>([Vec::new()])
            .into_connection();

        let found = find_project_by_key(&db, "ENG")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }
}
