//! Forge-side store operations: repository lifecycle, unprocessed-children
//! queries, and the narrow patches applied by the webhook ingress.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity;
use crate::entity::prelude::*;
use crate::source::{IssueRecord, PullRequestRecord, RepositoryRecord};

use super::errors::{Result, StoreError};

/// Create the repository row if absent, otherwise mark it in progress.
///
/// The parent entity is created exactly once, during the Metadata step;
/// subsequent syncs only flip its status back to `in_progress`.
pub async fn ensure_repository(
    db: &DatabaseConnection,
    record: &RepositoryRecord,
) -> Result<RepositoryModel> {
    if let Some(existing) = Repository::find_by_id(record.id).one(db).await? {
        let mut model: RepositoryActiveModel = existing.into();
        model.status = Set(SyncState::InProgress);
        return Ok(model.update(db).await?);
    }

    let model = record.active_model(SyncState::InProgress);
    Ok(model.insert(db).await?)
}

/// Resolve a repository by its `(owner, name)` natural key.
pub async fn find_repository_by_name(
    db: &DatabaseConnection,
    owner: &str,
    name: &str,
) -> Result<Option<RepositoryModel>> {
    Ok(Repository::find()
        .filter(RepositoryColumn::Owner.eq(owner))
        .filter(RepositoryColumn::Name.eq(name))
        .one(db)
        .await?)
}

/// Fetch a repository by id, erroring if it is absent.
pub async fn get_repository(db: &DatabaseConnection, id: i64) -> Result<RepositoryModel> {
    Repository::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("repository {id}")))
}

/// Set a repository back to `in_progress` for the duration of a run.
pub async fn mark_repository_in_progress(db: &DatabaseConnection, id: i64) -> Result<()> {
    set_repository_status(db, id, SyncState::InProgress).await
}

/// Mark a repository's sync as completed and stamp `last_synced_at`.
pub async fn complete_repository(db: &DatabaseConnection, id: i64) -> Result<()> {
    let repo = get_repository(db, id).await?;
    let mut model: RepositoryActiveModel = repo.into();
    model.status = Set(SyncState::Completed);
    model.last_synced_at = Set(Some(Utc::now().fixed_offset()));
    model.update(db).await?;
    Ok(())
}

/// Mark a repository's sync as failed.
pub async fn fail_repository(db: &DatabaseConnection, id: i64) -> Result<()> {
    set_repository_status(db, id, SyncState::Failed).await
}

async fn set_repository_status(db: &DatabaseConnection, id: i64, status: SyncState) -> Result<()> {
    let repo = get_repository(db, id).await?;
    let mut model: RepositoryActiveModel = repo.into();
    model.status = Set(status);
    model.update(db).await?;
    Ok(())
}

/// Pull requests whose child-fetch chain has not yet completed.
pub async fn unprocessed_pull_requests(
    db: &DatabaseConnection,
    repository_id: i64,
) -> Result<Vec<PullRequestModel>> {
    Ok(PullRequest::find()
        .filter(PullRequestColumn::RepositoryId.eq(repository_id))
        .filter(PullRequestColumn::ProcessedAt.is_null())
        .order_by_asc(PullRequestColumn::Number)
        .all(db)
        .await?)
}

/// Forge issues whose comments have not yet been pulled.
pub async fn unprocessed_issues(
    db: &DatabaseConnection,
    repository_id: i64,
) -> Result<Vec<IssueModel>> {
    Ok(Issue::find()
        .filter(IssueColumn::RepositoryId.eq(repository_id))
        .filter(IssueColumn::ProcessedAt.is_null())
        .order_by_asc(IssueColumn::Number)
        .all(db)
        .await?)
}

// ─── Webhook patches ─────────────────────────────────────────────────────────
//
// Incremental updates bypass the fetch pipeline: the payload already carries
// the new record, so these apply a single upsert-or-patch. Only the
// webhook-driven metadata fields (title, state, timestamps) are mutated on
// existing rows.

/// Refresh a repository's push/update timestamps after a push event.
pub async fn record_push(
    db: &DatabaseConnection,
    repository_id: i64,
    pushed_at: Option<chrono::DateTime<Utc>>,
) -> Result<()> {
    let repo = get_repository(db, repository_id).await?;
    let mut model: RepositoryActiveModel = repo.into();
    model.pushed_at = Set(pushed_at
        .map(|t| t.fixed_offset())
        .or(Some(Utc::now().fixed_offset())));
    model.update(db).await?;
    Ok(())
}

/// Insert or patch a single pull request from a webhook payload.
///
/// Returns `true` if a new row was created.
pub async fn patch_pull_request(
    db: &DatabaseConnection,
    record: &PullRequestRecord,
) -> Result<bool> {
    match PullRequest::find_by_id(record.id).one(db).await? {
        Some(existing) => {
            let mut model: entity::pull_request::ActiveModel = existing.into();
            model.title = Set(record.title.clone());
            model.state = Set(record.state.clone());
            model.updated_at = Set(record.updated_at.map(|t| t.fixed_offset()));
            model.merged_at = Set(record.merged_at.map(|t| t.fixed_offset()));
            model.closed_at = Set(record.closed_at.map(|t| t.fixed_offset()));
            model.update(db).await?;
            Ok(false)
        }
        None => {
            record.active_model().insert(db).await?;
            Ok(true)
        }
    }
}

/// Insert or patch a single issue from a webhook payload.
///
/// Returns `true` if a new row was created.
pub async fn patch_issue(db: &DatabaseConnection, record: &IssueRecord) -> Result<bool> {
    match Issue::find_by_id(record.id).one(db).await? {
        Some(existing) => {
            let mut model: entity::issue::ActiveModel = existing.into();
            model.title = Set(record.title.clone());
            model.state = Set(record.state.clone());
            model.updated_at = Set(record.updated_at.map(|t| t.fixed_offset()));
            model.closed_at = Set(record.closed_at.map(|t| t.fixed_offset()));
            model.update(db).await?;
            Ok(false)
        }
        None => {
            record.active_model().insert(db).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_repository_by_name_returns_none_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results::<RepositoryModel, _, _>([Vec::new()])
            .into_connection();

        let found = find_repository_by_name(&db, "acme", "widget")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn get_repository_errors_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results::<RepositoryModel, _, _>([Vec::new()])
            .into_connection();

        let err = get_repository(&db, 42).await.expect_err("should be missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(err.to_string().contains("42"));
    }
}
