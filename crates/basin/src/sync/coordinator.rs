//! The sync step coordinator.
//!
//! A full sync is fire-and-forget: `start_full_sync` spawns a background
//! task and returns immediately. All outcomes are communicated exclusively
//! through the progress hub - before each step an `IN_PROGRESS` event
//! announces it, after each step another carries the step's counts, and the
//! run ends with exactly one `COMPLETED` or `FAILED`.
//!
//! Within one run, steps execute strictly sequentially; later steps read
//! rows written by earlier ones. Runs for different parents are independent
//! tasks and may overlap freely.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use sea_orm::DatabaseConnection;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::entity::prelude::*;
use crate::source::{CommitRecord, ForgeApi, SourceError, TrackerApi, WorkspaceApi};
use crate::store::{self, StoreError};

use super::hub::ProgressHub;
use super::progress::ProgressEvent;
use super::step::{SyncSource, SyncStep};
use super::types::{EntityKind, ProjectSyncResult, SyncCount};

/// Commit batch size for the streaming commits step.
const COMMIT_BATCH_SIZE: usize = 500;

/// Buffered commit records between the crawl and the persistence loop.
const COMMIT_CHANNEL_BUFFER: usize = 500;

/// Errors that terminate a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A step failed in a way that invalidates the rest of the run.
    #[error("{step} step failed: {message}")]
    Step { step: SyncStep, message: String },

    /// Resuming against a parent that was never fully synced.
    #[error("parent not found: {key} - run a full sync from metadata first")]
    ParentNotFound { key: String },

    /// The requested start step does not belong to the source.
    #[error("step {step} does not belong to source {src}")]
    ForeignStep { src: SyncSource, step: SyncStep },
}

impl SyncError {
    fn step(step: SyncStep, err: impl std::fmt::Display) -> Self {
        Self::Step {
            step,
            message: err.to_string(),
        }
    }

    fn failing_step(&self) -> SyncStep {
        match self {
            SyncError::Step { step, .. } => *step,
            SyncError::ParentNotFound { .. } | SyncError::ForeignStep { .. } => SyncStep::Metadata,
        }
    }
}

/// The parent entity a run synchronizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Forge { owner: String, name: String },
    Tracker { key: String },
    Workspace { key: String },
}

impl SyncTarget {
    #[must_use]
    pub fn source(&self) -> SyncSource {
        match self {
            SyncTarget::Forge { .. } => SyncSource::Forge,
            SyncTarget::Tracker { .. } => SyncSource::Tracker,
            SyncTarget::Workspace { .. } => SyncSource::Workspace,
        }
    }

    /// The parent key as shown to operators.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            SyncTarget::Forge { owner, name } => format!("{owner}/{name}"),
            SyncTarget::Tracker { key } | SyncTarget::Workspace { key } => key.clone(),
        }
    }
}

struct CoordinatorInner {
    db: Arc<DatabaseConnection>,
    forge: Arc<dyn ForgeApi>,
    tracker: Arc<dyn TrackerApi>,
    workspace: Arc<dyn WorkspaceApi>,
    hub: ProgressHub,
}

/// Runs full and partial syncs and reports progress per subscriber.
#[derive(Clone)]
pub struct SyncCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl SyncCoordinator {
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        forge: Arc<dyn ForgeApi>,
        tracker: Arc<dyn TrackerApi>,
        workspace: Arc<dyn WorkspaceApi>,
        hub: ProgressHub,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                db,
                forge,
                tracker,
                workspace,
                hub,
            }),
        }
    }

    /// The hub runs publish through; used by the serving layer to subscribe.
    #[must_use]
    pub fn hub(&self) -> &ProgressHub {
        &self.inner.hub
    }

    /// Start a full (or resumed) sync on a background task.
    ///
    /// Returns as soon as the task is spawned; success or failure is
    /// observable only through the subscriber's progress channel. Concurrent
    /// runs for the same parent are not prevented here - callers that need
    /// exclusivity must serialize themselves.
    pub fn start_full_sync(
        &self,
        subscriber_id: &str,
        target: SyncTarget,
        start_from: Option<SyncStep>,
    ) {
        let inner = Arc::clone(&self.inner);
        let subscriber = subscriber_id.to_string();
        tokio::spawn(async move {
            run_sync(inner, subscriber, target, start_from).await;
        });
    }

    /// Re-run only the suffix of steps at or after `step`.
    ///
    /// This is the recovery path after a `FAILED` run: completed steps are
    /// not re-fetched, and the idempotent store makes any overlap harmless.
    pub fn retry_from_step(&self, subscriber_id: &str, target: SyncTarget, step: SyncStep) {
        self.start_full_sync(subscriber_id, target, Some(step));
    }
}

async fn run_sync(
    inner: Arc<CoordinatorInner>,
    subscriber: String,
    target: SyncTarget,
    start_from: Option<SyncStep>,
) -> ProjectSyncResult {
    let started = Instant::now();
    let key = target.key();
    let source = target.source();
    let mut counts: BTreeMap<EntityKind, SyncCount> = BTreeMap::new();

    tracing::info!(key = %key, source = %source, "sync run starting");

    let outcome = execute_steps(
        &inner,
        &subscriber,
        &target,
        start_from,
        &mut counts,
    )
    .await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => {
            inner
                .hub
                .publish(
                    &subscriber,
                    ProgressEvent::completed(
                        &subscriber,
                        format!("sync of {key} completed in {elapsed_ms} ms"),
                    ),
                )
                .await;
            tracing::info!(key = %key, elapsed_ms, "sync run completed");
            ProjectSyncResult {
                key,
                success: true,
                error_message: None,
                counts,
                elapsed_ms,
            }
        }
        Err(err) => {
            let message = err.to_string();
            mark_parent_failed(&inner, &target).await;
            inner
                .hub
                .publish(
                    &subscriber,
                    ProgressEvent::failed(&subscriber, err.failing_step(), message.clone()),
                )
                .await;
            tracing::warn!(key = %key, error = %message, "sync run failed");
            ProjectSyncResult {
                key,
                success: false,
                error_message: Some(message),
                counts,
                elapsed_ms,
            }
        }
    }
}

async fn execute_steps(
    inner: &CoordinatorInner,
    subscriber: &str,
    target: &SyncTarget,
    start_from: Option<SyncStep>,
    counts: &mut BTreeMap<EntityKind, SyncCount>,
) -> Result<(), SyncError> {
    let source = target.source();
    let start = start_from.unwrap_or(source.steps()[0]);
    let steps = source
        .steps_from(start)
        .ok_or(SyncError::ForeignStep { src: source, step: start })?;

    match target {
        SyncTarget::Forge { owner, name } => {
            run_forge_steps(inner, subscriber, owner, name, steps, counts).await
        }
        SyncTarget::Tracker { key } => {
            run_tracker_steps(inner, subscriber, key, steps, counts).await
        }
        SyncTarget::Workspace { key } => {
            run_workspace_steps(inner, subscriber, key, steps, counts).await
        }
    }
}

async fn mark_parent_failed(inner: &CoordinatorInner, target: &SyncTarget) {
    let result = match target {
        SyncTarget::Forge { owner, name } => {
            match store::forge::find_repository_by_name(&inner.db, owner, name).await {
                Ok(Some(repo)) => store::forge::fail_repository(&inner.db, repo.id).await,
                other => other.map(|_| ()),
            }
        }
        SyncTarget::Tracker { key } => {
            match store::tracker::find_project_by_key(&inner.db, key).await {
                Ok(Some(project)) => store::tracker::fail_project(&inner.db, project.id).await,
                other => other.map(|_| ()),
            }
        }
        SyncTarget::Workspace { key } => store::workspace::fail_workspace(&inner.db, key).await,
    };

    if let Err(e) = result {
        tracing::debug!(key = %target.key(), error = %e, "could not mark parent failed");
    }
}

/// Record a per-step count and emit the step-finished event.
async fn finish_step(
    inner: &CoordinatorInner,
    subscriber: &str,
    step: SyncStep,
    kind: EntityKind,
    count: SyncCount,
    counts: &mut BTreeMap<EntityKind, SyncCount>,
) {
    *counts.entry(kind).or_default() += count;
    inner
        .hub
        .publish(
            subscriber,
            ProgressEvent::in_progress(
                subscriber,
                step,
                Some(count),
                format!(
                    "{step}: fetched {}, saved {}, skipped {}",
                    count.total_fetched, count.saved, count.skipped
                ),
            ),
        )
        .await;
}

async fn announce_step(inner: &CoordinatorInner, subscriber: &str, step: SyncStep, key: &str) {
    inner
        .hub
        .publish(
            subscriber,
            ProgressEvent::in_progress(subscriber, step, None, format!("{step}: syncing {key}")),
        )
        .await;
}

/// Fold a per-unit fetch failure into a zero count.
fn zero_on_fetch_error(context: &str, err: &SourceError) -> SyncCount {
    tracing::warn!(context, error = %err, "fetch failed, counting zero and continuing");
    SyncCount::empty()
}

// ─── Forge steps ─────────────────────────────────────────────────────────────

async fn run_forge_steps(
    inner: &CoordinatorInner,
    subscriber: &str,
    owner: &str,
    name: &str,
    steps: &[SyncStep],
    counts: &mut BTreeMap<EntityKind, SyncCount>,
) -> Result<(), SyncError> {
    let key = format!("{owner}/{name}");
    let db = &inner.db;
    let first_step = steps.first().copied().unwrap_or(SyncStep::Metadata);

    // Resolve the parent. Runs that skip Metadata require a prior full sync
    // baseline; there is nothing to attach children to otherwise.
    let mut repository_id = match store::forge::find_repository_by_name(db, owner, name).await {
        Ok(Some(repo)) => {
            store::forge::mark_repository_in_progress(db, repo.id)
                .await
                .map_err(|e| SyncError::step(first_step, e))?;
            Some(repo.id)
        }
        Ok(None) => None,
        Err(e) => return Err(SyncError::step(first_step, e)),
    };

    if repository_id.is_none() && steps.first() != Some(&SyncStep::Metadata) {
        return Err(SyncError::ParentNotFound { key });
    }

    for &step in steps {
        announce_step(inner, subscriber, step, &key).await;

        match step {
            SyncStep::Metadata => {
                // Metadata failure fails the whole run.
                let record = inner
                    .forge
                    .get_repository(owner, name)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                let created = repository_id.is_none();
                let model = store::forge::ensure_repository(db, &record)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                repository_id = Some(model.id);
                let count = SyncCount::new(1, usize::from(created));
                finish_step(inner, subscriber, step, EntityKind::Repository, count, counts).await;
            }
            SyncStep::Commits => {
                let repo_id = repository_id.expect("parent resolved above");
                let count =
                    sync_commits_streaming(inner, repo_id, owner, name)
                        .await
                        .map_err(|e| SyncError::step(step, e))?;
                finish_step(inner, subscriber, step, EntityKind::Commit, count, counts).await;
            }
            SyncStep::PullRequests => {
                let repo_id = repository_id.expect("parent resolved above");
                let count = match inner.forge.list_pull_requests(repo_id, owner, name).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id, r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<PullRequest, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("pull requests", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::PullRequest, count, counts).await;
            }
            SyncStep::Issues => {
                let repo_id = repository_id.expect("parent resolved above");
                let count = match inner.forge.list_issues(repo_id, owner, name).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id, r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<Issue, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("issues", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::Issue, count, counts).await;
            }
            SyncStep::Comments => {
                let repo_id = repository_id.expect("parent resolved above");
                let count = sync_forge_comments(inner, repo_id, owner, name)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                finish_step(inner, subscriber, step, EntityKind::Comment, count, counts).await;
            }
            SyncStep::Reviews => {
                let repo_id = repository_id.expect("parent resolved above");
                let count = sync_forge_reviews(inner, repo_id, owner, name)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                finish_step(inner, subscriber, step, EntityKind::Review, count, counts).await;
            }
            SyncStep::FileChanges => {
                let repo_id = repository_id.expect("parent resolved above");
                let count = sync_forge_file_changes(inner, repo_id, owner, name)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                finish_step(inner, subscriber, step, EntityKind::FileChange, count, counts).await;
            }
            other => {
                return Err(SyncError::ForeignStep {
                    src: SyncSource::Forge,
                    step: other,
                });
            }
        }
    }

    if let Some(repo_id) = repository_id {
        store::forge::complete_repository(&inner.db, repo_id)
            .await
            .map_err(|e| SyncError::step(SyncStep::Completed, e))?;
    }

    Ok(())
}

/// Stream commits from the crawl straight into batched upserts.
///
/// The crawl and the persistence loop run concurrently; each full batch is
/// written while later pages are still being fetched. A crawl error after
/// some pages keeps the partially persisted counts (the store is
/// duplicate-safe on the next run).
async fn sync_commits_streaming(
    inner: &CoordinatorInner,
    repository_id: i64,
    owner: &str,
    name: &str,
) -> Result<SyncCount, StoreError> {
    let (tx, mut rx) = mpsc::channel::<CommitRecord>(COMMIT_CHANNEL_BUFFER);

    let fetch = inner.forge.stream_commits(repository_id, owner, name, tx);

    let persist = async {
        let mut total = SyncCount::empty();
        let mut batch: Vec<(String, CommitActiveModel)> = Vec::with_capacity(COMMIT_BATCH_SIZE);
        while let Some(record) = rx.recv().await {
            batch.push((record.sha.clone(), record.active_model()));
            if batch.len() >= COMMIT_BATCH_SIZE {
                total += store::upsert_batch::<Commit, _>(&inner.db, std::mem::take(&mut batch))
                    .await?;
            }
        }
        if !batch.is_empty() {
            total += store::upsert_batch::<Commit, _>(&inner.db, batch).await?;
        }
        Ok::<SyncCount, StoreError>(total)
    };

    let (fetch_result, persist_result) = tokio::join!(fetch, persist);
    let count = persist_result?;

    if let Err(e) = fetch_result {
        // Transient fetch failure: zero for the unfetched remainder, the
        // pages already persisted stay counted.
        tracing::warn!(error = %e, "commit crawl aborted early");
    }

    Ok(count)
}

/// Comments fan-out: every unprocessed pull request and issue, one child at
/// a time. A failing child is logged and counted as zero; it must never
/// abort the siblings.
async fn sync_forge_comments(
    inner: &CoordinatorInner,
    repository_id: i64,
    owner: &str,
    name: &str,
) -> Result<SyncCount, StoreError> {
    let db = &inner.db;
    let mut total = SyncCount::empty();

    for pull in store::forge::unprocessed_pull_requests(db, repository_id).await? {
        match inner
            .forge
            .list_pull_request_comments(pull.id, owner, name, pull.number)
            .await
        {
            Ok(records) => {
                let batch = records
                    .iter()
                    .map(|r| (r.id, r.active_model()))
                    .collect::<Vec<_>>();
                match store::upsert_batch::<Comment, _>(db, batch).await {
                    Ok(count) => total += count,
                    Err(e) => {
                        tracing::warn!(pull = pull.number, error = %e, "comment persist failed")
                    }
                }
            }
            Err(e) => total += zero_on_fetch_error("pull request comments", &e),
        }
    }

    for issue in store::forge::unprocessed_issues(db, repository_id).await? {
        let number = issue.number.unwrap_or_default();
        match inner
            .forge
            .list_issue_comments(issue.id, owner, name, number)
            .await
        {
            Ok(records) => {
                let batch = records
                    .iter()
                    .map(|r| (r.id, r.active_model()))
                    .collect::<Vec<_>>();
                match store::upsert_batch::<Comment, _>(db, batch).await {
                    Ok(count) => {
                        total += count;
                        // Issue children are just comments; the marker means
                        // this issue needs no re-visit on the next sync.
                        if count.saved > 0 || count.total_fetched == 0 {
                            if let Err(e) = store::mark_processed::<Issue>(db, issue.id).await {
                                tracing::warn!(issue = issue.id, error = %e, "mark processed failed");
                            }
                        }
                    }
                    Err(e) => tracing::warn!(issue = issue.id, error = %e, "comment persist failed"),
                }
            }
            Err(e) => total += zero_on_fetch_error("issue comments", &e),
        }
    }

    Ok(total)
}

async fn sync_forge_reviews(
    inner: &CoordinatorInner,
    repository_id: i64,
    owner: &str,
    name: &str,
) -> Result<SyncCount, StoreError> {
    let db = &inner.db;
    let mut total = SyncCount::empty();

    for pull in store::forge::unprocessed_pull_requests(db, repository_id).await? {
        match inner
            .forge
            .list_reviews(pull.id, owner, name, pull.number)
            .await
        {
            Ok(records) => {
                let batch = records
                    .iter()
                    .map(|r| (r.id, r.active_model()))
                    .collect::<Vec<_>>();
                match store::upsert_batch::<Review, _>(db, batch).await {
                    Ok(count) => total += count,
                    Err(e) => tracing::warn!(pull = pull.number, error = %e, "review persist failed"),
                }
            }
            Err(e) => total += zero_on_fetch_error("reviews", &e),
        }
    }

    Ok(total)
}

/// File-changes fan-out. This is the last child step for a pull request, so
/// a successful fetch here sets the pull request's processed marker.
async fn sync_forge_file_changes(
    inner: &CoordinatorInner,
    repository_id: i64,
    owner: &str,
    name: &str,
) -> Result<SyncCount, StoreError> {
    let db = &inner.db;
    let mut total = SyncCount::empty();

    for pull in store::forge::unprocessed_pull_requests(db, repository_id).await? {
        match inner
            .forge
            .list_file_changes(pull.id, owner, name, pull.number)
            .await
        {
            Ok(records) => {
                let batch = records
                    .iter()
                    .map(|r| (r.change_key(), r.active_model()))
                    .collect::<Vec<_>>();
                match store::upsert_batch::<FileChange, _>(db, batch).await {
                    Ok(count) => {
                        total += count;
                        if count.saved > 0 || count.total_fetched == 0 {
                            if let Err(e) = store::mark_processed::<PullRequest>(db, pull.id).await
                            {
                                tracing::warn!(pull = pull.number, error = %e, "mark processed failed");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(pull = pull.number, error = %e, "file change persist failed")
                    }
                }
            }
            Err(e) => total += zero_on_fetch_error("file changes", &e),
        }
    }

    Ok(total)
}

// ─── Tracker steps ───────────────────────────────────────────────────────────

async fn run_tracker_steps(
    inner: &CoordinatorInner,
    subscriber: &str,
    key: &str,
    steps: &[SyncStep],
    counts: &mut BTreeMap<EntityKind, SyncCount>,
) -> Result<(), SyncError> {
    let db = &inner.db;
    let first_step = steps.first().copied().unwrap_or(SyncStep::Metadata);

    let mut project_id = match store::tracker::find_project_by_key(db, key).await {
        Ok(Some(project)) => {
            store::tracker::mark_project_in_progress(db, project.id)
                .await
                .map_err(|e| SyncError::step(first_step, e))?;
            Some(project.id)
        }
        Ok(None) => None,
        Err(e) => return Err(SyncError::step(first_step, e)),
    };

    if project_id.is_none() && steps.first() != Some(&SyncStep::Metadata) {
        return Err(SyncError::ParentNotFound {
            key: key.to_string(),
        });
    }

    for &step in steps {
        announce_step(inner, subscriber, step, key).await;

        match step {
            SyncStep::Metadata => {
                let record = inner
                    .tracker
                    .get_project(key)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                let created = project_id.is_none();
                let model = store::tracker::ensure_project(db, &record)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                project_id = Some(model.id);
                let count = SyncCount::new(1, usize::from(created));
                finish_step(inner, subscriber, step, EntityKind::Project, count, counts).await;
            }
            SyncStep::Users => {
                let id = project_id.expect("parent resolved above");
                let count = match inner.tracker.list_users(id, key).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id.clone(), r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<Account, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("tracker users", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::Account, count, counts).await;
            }
            SyncStep::Issues => {
                let id = project_id.expect("parent resolved above");
                let count = match inner.tracker.list_issues(id, key).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id, r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<Issue, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("tracker issues", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::Issue, count, counts).await;
            }
            SyncStep::IssueLinks => {
                let id = project_id.expect("parent resolved above");
                let count = match inner.tracker.list_issue_links(id, key).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id, r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<IssueLink, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("issue links", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::IssueLink, count, counts).await;
            }
            SyncStep::Attachments => {
                let id = project_id.expect("parent resolved above");
                let count = sync_tracker_attachments(inner, id)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                finish_step(inner, subscriber, step, EntityKind::Attachment, count, counts).await;
            }
            other => {
                return Err(SyncError::ForeignStep {
                    src: SyncSource::Tracker,
                    step: other,
                });
            }
        }
    }

    if let Some(id) = project_id {
        store::tracker::complete_project(db, id)
            .await
            .map_err(|e| SyncError::step(SyncStep::Completed, e))?;
    }

    Ok(())
}

/// Attachments fan-out over unprocessed tracker issues, one child at a
/// time, with per-child error isolation.
async fn sync_tracker_attachments(
    inner: &CoordinatorInner,
    project_id: i64,
) -> Result<SyncCount, StoreError> {
    let db = &inner.db;
    let mut total = SyncCount::empty();

    for issue in store::tracker::unprocessed_issues(db, project_id).await? {
        let Some(issue_key) = issue.key.clone() else {
            continue;
        };
        match inner.tracker.list_attachments(issue.id, &issue_key).await {
            Ok(records) => {
                let batch = records
                    .iter()
                    .map(|r| (r.id, r.active_model()))
                    .collect::<Vec<_>>();
                match store::upsert_batch::<Attachment, _>(db, batch).await {
                    Ok(count) => {
                        total += count;
                        if count.saved > 0 || count.total_fetched == 0 {
                            if let Err(e) = store::mark_processed::<Issue>(db, issue.id).await {
                                tracing::warn!(issue = %issue_key, error = %e, "mark processed failed");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(issue = %issue_key, error = %e, "attachment persist failed")
                    }
                }
            }
            Err(e) => total += zero_on_fetch_error("attachments", &e),
        }
    }

    Ok(total)
}

// ─── Workspace steps ─────────────────────────────────────────────────────────

async fn run_workspace_steps(
    inner: &CoordinatorInner,
    subscriber: &str,
    key: &str,
    steps: &[SyncStep],
    counts: &mut BTreeMap<EntityKind, SyncCount>,
) -> Result<(), SyncError> {
    let db = &inner.db;
    let first_step = steps.first().copied().unwrap_or(SyncStep::Metadata);

    let mut workspace_known = match store::workspace::get_workspace(db, key).await {
        Ok(_) => {
            store::workspace::mark_workspace_in_progress(db, key)
                .await
                .map_err(|e| SyncError::step(first_step, e))?;
            true
        }
        Err(StoreError::NotFound { .. }) => false,
        Err(e) => return Err(SyncError::step(first_step, e)),
    };

    if !workspace_known && steps.first() != Some(&SyncStep::Metadata) {
        return Err(SyncError::ParentNotFound {
            key: key.to_string(),
        });
    }

    for &step in steps {
        announce_step(inner, subscriber, step, key).await;

        match step {
            SyncStep::Metadata => {
                let record = inner
                    .workspace
                    .get_workspace(key)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                let created = !workspace_known;
                store::workspace::ensure_workspace(db, &record)
                    .await
                    .map_err(|e| SyncError::step(step, e))?;
                workspace_known = true;
                let count = SyncCount::new(1, usize::from(created));
                finish_step(inner, subscriber, step, EntityKind::Workspace, count, counts).await;
            }
            SyncStep::Pages => {
                let count = match inner.workspace.list_pages(key).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id.clone(), r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<Page, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("pages", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::Page, count, counts).await;
            }
            SyncStep::WorkspaceUsers => {
                let count = match inner.workspace.list_users(key).await {
                    Ok(records) => {
                        let batch = records
                            .iter()
                            .map(|r| (r.id.clone(), r.active_model()))
                            .collect::<Vec<_>>();
                        store::upsert_batch::<WorkspaceUser, _>(db, batch)
                            .await
                            .map_err(|e| SyncError::step(step, e))?
                    }
                    Err(e) => zero_on_fetch_error("workspace users", &e),
                };
                finish_step(inner, subscriber, step, EntityKind::WorkspaceUser, count, counts)
                    .await;
            }
            other => {
                return Err(SyncError::ForeignStep {
                    src: SyncSource::Workspace,
                    step: other,
                });
            }
        }
    }

    if workspace_known {
        store::workspace::complete_workspace(db, key)
            .await
            .map_err(|e| SyncError::step(SyncStep::Completed, e))?;
    }

    Ok(())
}
