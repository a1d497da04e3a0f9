//! Integration tests for the sync coordinator and progress channel.
//!
//! The coordinator is fire-and-forget, so every test drives it the way an
//! operator would: subscribe to the progress hub, start the run, and read
//! events until the terminal one. Upstream clients are in-memory stubs that
//! log their calls, which is what makes the resume-correctness assertions
//! possible.

#![cfg(feature = "migrate")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tokio::sync::mpsc;

use basin::connect_and_migrate;
use basin::entity::prelude::*;
use basin::source::{
    self, AccountRecord, AttachmentRecord, CommentRecord, CommitRecord, FileChangeRecord,
    ForgeApi, IssueLinkRecord, IssueRecord, PageRecord, ProjectRecord, PullRequestRecord,
    RepositoryRecord, ReviewRecord, SourceError, TrackerApi, WorkspaceApi, WorkspaceRecord,
    WorkspaceUserRecord,
};
use basin::sync::{
    ProgressEvent, ProgressHub, ProgressKind, SyncCoordinator, SyncStep, SyncTarget,
};

/// Maximum time any sync run should take in tests. If exceeded, there's
/// likely a hang or deadlock.
const RUN_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Stub clients ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct StubForge {
    repo: Option<RepositoryRecord>,
    commits: Vec<CommitRecord>,
    pulls: Vec<PullRequestRecord>,
    issues: Vec<IssueRecord>,
    pull_comments: HashMap<i64, Vec<CommentRecord>>,
    issue_comments: HashMap<i64, Vec<CommentRecord>>,
    reviews: HashMap<i64, Vec<ReviewRecord>>,
    files: HashMap<i64, Vec<FileChangeRecord>>,
    /// Pull request id whose comment fetch fails (fan-out isolation tests).
    fail_comments_for: Option<i64>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubForge {
    fn record(&self, method: &'static str) {
        self.calls.lock().expect("call log lock").push(method);
    }

    fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .expect("call log lock")
            .iter()
            .filter(|m| **m == method)
            .count()
    }

    fn clear_calls(&self) {
        self.calls.lock().expect("call log lock").clear();
    }
}

#[async_trait]
impl ForgeApi for StubForge {
    async fn get_repository(&self, owner: &str, name: &str) -> source::Result<RepositoryRecord> {
        self.record("get_repository");
        self.repo
            .clone()
            .ok_or_else(|| SourceError::not_found(format!("{owner}/{name}")))
    }

    async fn list_commits(
        &self,
        _repository_id: i64,
        _owner: &str,
        _name: &str,
    ) -> source::Result<Vec<CommitRecord>> {
        self.record("list_commits");
        Ok(self.commits.clone())
    }

    async fn stream_commits(
        &self,
        _repository_id: i64,
        _owner: &str,
        _name: &str,
        tx: mpsc::Sender<CommitRecord>,
    ) -> source::Result<usize> {
        self.record("stream_commits");
        let mut sent = 0;
        for commit in &self.commits {
            if tx.send(commit.clone()).await.is_err() {
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }

    async fn list_pull_requests(
        &self,
        _repository_id: i64,
        _owner: &str,
        _name: &str,
    ) -> source::Result<Vec<PullRequestRecord>> {
        self.record("list_pull_requests");
        Ok(self.pulls.clone())
    }

    async fn list_issues(
        &self,
        _repository_id: i64,
        _owner: &str,
        _name: &str,
    ) -> source::Result<Vec<IssueRecord>> {
        self.record("list_issues");
        Ok(self.issues.clone())
    }

    async fn list_pull_request_comments(
        &self,
        pull_request_id: i64,
        _owner: &str,
        _name: &str,
        _number: i32,
    ) -> source::Result<Vec<CommentRecord>> {
        self.record("list_pull_request_comments");
        if self.fail_comments_for == Some(pull_request_id) {
            return Err(SourceError::network("connection reset by peer"));
        }
        Ok(self
            .pull_comments
            .get(&pull_request_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_issue_comments(
        &self,
        issue_id: i64,
        _owner: &str,
        _name: &str,
        _number: i32,
    ) -> source::Result<Vec<CommentRecord>> {
        self.record("list_issue_comments");
        Ok(self
            .issue_comments
            .get(&issue_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_reviews(
        &self,
        pull_request_id: i64,
        _owner: &str,
        _name: &str,
        _number: i32,
    ) -> source::Result<Vec<ReviewRecord>> {
        self.record("list_reviews");
        Ok(self.reviews.get(&pull_request_id).cloned().unwrap_or_default())
    }

    async fn list_file_changes(
        &self,
        pull_request_id: i64,
        _owner: &str,
        _name: &str,
        _number: i32,
    ) -> source::Result<Vec<FileChangeRecord>> {
        self.record("list_file_changes");
        Ok(self.files.get(&pull_request_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct StubTracker {
    project: Option<ProjectRecord>,
    users: Vec<AccountRecord>,
    issues: Vec<IssueRecord>,
    links: Vec<IssueLinkRecord>,
    attachments: HashMap<i64, Vec<AttachmentRecord>>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubTracker {
    fn record(&self, method: &'static str) {
        self.calls.lock().expect("call log lock").push(method);
    }
}

#[async_trait]
impl TrackerApi for StubTracker {
    async fn get_project(&self, key: &str) -> source::Result<ProjectRecord> {
        self.record("get_project");
        self.project
            .clone()
            .ok_or_else(|| SourceError::not_found(key.to_string()))
    }

    async fn list_users(&self, _project_id: i64, _key: &str) -> source::Result<Vec<AccountRecord>> {
        self.record("list_users");
        Ok(self.users.clone())
    }

    async fn list_issues(&self, _project_id: i64, _key: &str) -> source::Result<Vec<IssueRecord>> {
        self.record("list_issues");
        Ok(self.issues.clone())
    }

    async fn list_issue_links(
        &self,
        _project_id: i64,
        _key: &str,
    ) -> source::Result<Vec<IssueLinkRecord>> {
        self.record("list_issue_links");
        Ok(self.links.clone())
    }

    async fn list_attachments(
        &self,
        issue_id: i64,
        _issue_key: &str,
    ) -> source::Result<Vec<AttachmentRecord>> {
        self.record("list_attachments");
        Ok(self.attachments.get(&issue_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct StubWorkspace {
    workspace: Option<WorkspaceRecord>,
    pages: Vec<PageRecord>,
    users: Vec<WorkspaceUserRecord>,
}

#[async_trait]
impl WorkspaceApi for StubWorkspace {
    async fn get_workspace(&self, key: &str) -> source::Result<WorkspaceRecord> {
        self.workspace
            .clone()
            .ok_or_else(|| SourceError::not_found(key.to_string()))
    }

    async fn list_pages(&self, _workspace_id: &str) -> source::Result<Vec<PageRecord>> {
        Ok(self.pages.clone())
    }

    async fn list_users(&self, _workspace_id: &str) -> source::Result<Vec<WorkspaceUserRecord>> {
        Ok(self.users.clone())
    }
}

// ─── Fixtures ──────────────────────────────────────────────────────────────────

fn repo_record() -> RepositoryRecord {
    RepositoryRecord {
        id: 1,
        owner: "acme".to_string(),
        name: "widget".to_string(),
        description: Some("tooling".to_string()),
        default_branch: "main".to_string(),
        created_at: None,
        updated_at: None,
        pushed_at: None,
    }
}

fn commit(sha: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        repository_id: 1,
        author_name: Some("Dev".to_string()),
        author_email: None,
        message: format!("commit {sha}"),
        committed_at: None,
        additions: None,
        deletions: None,
    }
}

fn pull(id: i64, number: i32) -> PullRequestRecord {
    PullRequestRecord {
        id,
        repository_id: 1,
        number,
        title: format!("pull {number}"),
        body: None,
        state: "open".to_string(),
        author: Some("dev".to_string()),
        created_at: None,
        updated_at: None,
        merged_at: None,
        closed_at: None,
    }
}

fn forge_issue(id: i64, number: i32) -> IssueRecord {
    IssueRecord {
        id,
        repository_id: Some(1),
        project_id: None,
        number: Some(number),
        key: None,
        title: format!("issue {number}"),
        body: None,
        state: "open".to_string(),
        author: None,
        created_at: None,
        updated_at: None,
        closed_at: None,
    }
}

fn comment(id: i64, pull_request_id: Option<i64>, issue_id: Option<i64>) -> CommentRecord {
    CommentRecord {
        id,
        pull_request_id,
        issue_id,
        author: Some("dev".to_string()),
        body: format!("comment {id}"),
        created_at: None,
        updated_at: None,
    }
}

fn populated_forge() -> StubForge {
    let mut forge = StubForge {
        repo: Some(repo_record()),
        commits: vec![commit("a"), commit("b"), commit("c")],
        pulls: vec![pull(100, 1), pull(101, 2)],
        issues: vec![forge_issue(200, 10)],
        ..StubForge::default()
    };
    forge
        .pull_comments
        .insert(100, vec![comment(300, Some(100), None)]);
    forge
        .pull_comments
        .insert(101, vec![comment(301, Some(101), None), comment(302, Some(101), None)]);
    forge
        .issue_comments
        .insert(200, vec![comment(303, None, Some(200))]);
    forge.reviews.insert(
        100,
        vec![ReviewRecord {
            id: 400,
            pull_request_id: 100,
            author: Some("reviewer".to_string()),
            state: "approved".to_string(),
            body: None,
            submitted_at: None,
        }],
    );
    forge.files.insert(
        100,
        vec![FileChangeRecord {
            pull_request_id: 100,
            path: "src/lib.rs".to_string(),
            status: "modified".to_string(),
            additions: 4,
            deletions: 1,
        }],
    );
    forge.files.insert(
        101,
        vec![FileChangeRecord {
            pull_request_id: 101,
            path: "README.md".to_string(),
            status: "added".to_string(),
            additions: 20,
            deletions: 0,
        }],
    );
    forge
}

struct Harness {
    db: Arc<DatabaseConnection>,
    forge: Arc<StubForge>,
    tracker: Arc<StubTracker>,
    hub: ProgressHub,
    coordinator: SyncCoordinator,
}

async fn harness(forge: StubForge, tracker: StubTracker) -> Harness {
    harness_with_workspace(forge, tracker, StubWorkspace::default()).await
}

async fn harness_with_workspace(
    forge: StubForge,
    tracker: StubTracker,
    workspace: StubWorkspace,
) -> Harness {
    let db = Arc::new(
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database should migrate"),
    );
    let forge = Arc::new(forge);
    let tracker = Arc::new(tracker);
    let workspace = Arc::new(workspace);
    let hub = ProgressHub::default();
    let coordinator = SyncCoordinator::new(
        Arc::clone(&db),
        Arc::clone(&forge) as Arc<dyn ForgeApi>,
        Arc::clone(&tracker) as Arc<dyn TrackerApi>,
        workspace as Arc<dyn WorkspaceApi>,
        hub.clone(),
    );
    Harness {
        db,
        forge,
        tracker,
        hub,
        coordinator,
    }
}

fn forge_target() -> SyncTarget {
    SyncTarget::Forge {
        owner: "acme".to_string(),
        name: "widget".to_string(),
    }
}

/// Read events until the terminal one; the channel closes right after it.
async fn collect_run(rx: &mut mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    tokio::time::timeout(RUN_TIMEOUT, async {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let terminal = event.kind.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    })
    .await
    .expect("run should finish within the timeout")
}

// ─── Full run ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_forge_sync_persists_every_kind() {
    let h = harness(populated_forge(), StubTracker::default()).await;
    let mut rx = h.hub.subscribe("op-1").await;

    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;

    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 3);
    assert_eq!(PullRequest::find().count(&*h.db).await.unwrap(), 2);
    assert_eq!(Issue::find().count(&*h.db).await.unwrap(), 1);
    assert_eq!(Comment::find().count(&*h.db).await.unwrap(), 4);
    assert_eq!(Review::find().count(&*h.db).await.unwrap(), 1);
    assert_eq!(FileChange::find().count(&*h.db).await.unwrap(), 2);

    let repo = Repository::find_by_id(1)
        .one(&*h.db)
        .await
        .unwrap()
        .expect("repository exists");
    assert_eq!(repo.status, SyncState::Completed);
    assert!(repo.last_synced_at.is_some());

    // The file-changes step closed the chain for both pulls.
    let unprocessed = basin::store::forge::unprocessed_pull_requests(&h.db, 1)
        .await
        .unwrap();
    assert!(unprocessed.is_empty());

    // Per-step counts are carried on the step-finished events.
    let commits_count = events
        .iter()
        .filter(|e| e.step == Some(SyncStep::Commits))
        .find_map(|e| e.counts)
        .expect("commits step reports counts");
    assert_eq!(commits_count.total_fetched, 3);
    assert_eq!(commits_count.saved, 3);
}

/// The observed event sequence is CONNECT, then a run of IN_PROGRESS,
/// terminated by exactly one COMPLETED.
#[tokio::test]
async fn event_stream_is_connect_then_progress_then_one_terminal() {
    let h = harness(populated_forge(), StubTracker::default()).await;
    let mut rx = h.hub.subscribe("op-1").await;

    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;

    assert_eq!(events.first().map(|e| e.kind), Some(ProgressKind::Connect));
    let terminal_count = events.iter().filter(|e| e.kind.is_terminal()).count();
    assert_eq!(terminal_count, 1);
    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));
    assert!(
        events[1..events.len() - 1]
            .iter()
            .all(|e| e.kind == ProgressKind::InProgress)
    );

    // The channel closed after the terminal event.
    assert!(rx.recv().await.is_none());
    assert!(!h.hub.is_live("op-1").await);
}

// ─── Resume ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn retry_from_step_skips_earlier_fetches() {
    let h = harness(populated_forge(), StubTracker::default()).await;

    let mut rx = h.hub.subscribe("op-1").await;
    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;
    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    let commits_before = Commit::find().count(&*h.db).await.unwrap();
    h.forge.clear_calls();

    // Resume from comments: metadata, commits, pulls, and issues must not be
    // fetched again.
    let mut rx = h.hub.subscribe("op-1").await;
    h.coordinator
        .retry_from_step("op-1", forge_target(), SyncStep::Comments);
    let events = collect_run(&mut rx).await;

    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));
    assert_eq!(h.forge.call_count("get_repository"), 0);
    assert_eq!(h.forge.call_count("stream_commits"), 0);
    assert_eq!(h.forge.call_count("list_commits"), 0);
    assert_eq!(h.forge.call_count("list_pull_requests"), 0);
    assert_eq!(h.forge.call_count("list_issues"), 0);

    // The resumed suffix announced only its own steps.
    let resumed_steps: Vec<_> = events
        .iter()
        .filter_map(|e| e.step)
        .filter(|s| *s != SyncStep::Completed)
        .collect();
    assert!(resumed_steps.iter().all(|s| matches!(
        s,
        SyncStep::Comments | SyncStep::Reviews | SyncStep::FileChanges
    )));

    // Aggregate outcome matches an uninterrupted run.
    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), commits_before);
    assert_eq!(Comment::find().count(&*h.db).await.unwrap(), 4);
    let repo = Repository::find_by_id(1).one(&*h.db).await.unwrap().unwrap();
    assert_eq!(repo.status, SyncState::Completed);
}

#[tokio::test]
async fn resume_without_baseline_fails_with_parent_not_found() {
    let h = harness(populated_forge(), StubTracker::default()).await;
    let mut rx = h.hub.subscribe("op-1").await;

    h.coordinator
        .retry_from_step("op-1", forge_target(), SyncStep::Comments);
    let events = collect_run(&mut rx).await;

    let terminal = events.last().expect("terminal event");
    assert_eq!(terminal.kind, ProgressKind::Failed);
    assert!(terminal.message.contains("full sync"));

    // Nothing was fetched or persisted.
    assert_eq!(h.forge.call_count("list_pull_request_comments"), 0);
    assert_eq!(Comment::find().count(&*h.db).await.unwrap(), 0);
}

// ─── Failure paths ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn metadata_failure_fails_the_whole_run() {
    let forge = StubForge::default(); // no repo configured
    let h = harness(forge, StubTracker::default()).await;
    let mut rx = h.hub.subscribe("op-1").await;

    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;

    let terminal = events.last().expect("terminal event");
    assert_eq!(terminal.kind, ProgressKind::Failed);
    assert_eq!(terminal.step, Some(SyncStep::Metadata));

    // Steps after the failing one were not attempted.
    assert_eq!(h.forge.call_count("stream_commits"), 0);
    assert_eq!(Repository::find().count(&*h.db).await.unwrap(), 0);
}

#[tokio::test]
async fn one_failing_child_does_not_abort_the_fan_out() {
    let mut forge = populated_forge();
    forge.fail_comments_for = Some(100);
    let h = harness(forge, StubTracker::default()).await;
    let mut rx = h.hub.subscribe("op-1").await;

    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;

    // The run still completes; the failing child folded into the aggregate
    // as a zero count.
    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    // Pull 101's two comments and the issue comment survived; pull 100's
    // comment is missing.
    assert_eq!(Comment::find().count(&*h.db).await.unwrap(), 3);

    let comments_count = events
        .iter()
        .filter(|e| e.step == Some(SyncStep::Comments))
        .find_map(|e| e.counts)
        .expect("comments step reports counts");
    assert_eq!(comments_count.total_fetched, 3);
    assert_eq!(comments_count.saved, 3);
}

// ─── Tracker source ────────────────────────────────────────────────────────────

fn populated_tracker() -> StubTracker {
    let mut tracker = StubTracker {
        project: Some(ProjectRecord {
            id: 3,
            key: "ENG".to_string(),
            name: "Engineering".to_string(),
            description: None,
        }),
        users: vec![AccountRecord {
            id: "u1".to_string(),
            project_id: 3,
            display_name: "Dev".to_string(),
            email: None,
            active: true,
        }],
        issues: vec![
            IssueRecord {
                id: 900,
                repository_id: None,
                project_id: Some(3),
                number: None,
                key: Some("ENG-1".to_string()),
                title: "first".to_string(),
                body: None,
                state: "To Do".to_string(),
                author: None,
                created_at: None,
                updated_at: None,
                closed_at: None,
            },
            IssueRecord {
                id: 901,
                repository_id: None,
                project_id: Some(3),
                number: None,
                key: Some("ENG-2".to_string()),
                title: "second".to_string(),
                body: None,
                state: "Done".to_string(),
                author: None,
                created_at: None,
                updated_at: None,
                closed_at: None,
            },
        ],
        links: vec![IssueLinkRecord {
            id: 50,
            project_id: 3,
            source_issue_id: 900,
            target_issue_id: 901,
            link_type: "blocks".to_string(),
        }],
        ..StubTracker::default()
    };
    tracker.attachments.insert(
        900,
        vec![AttachmentRecord {
            id: 70,
            issue_id: 900,
            filename: "design.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            size: Some(1024),
            author: None,
            created_at: None,
        }],
    );
    tracker
}

#[tokio::test]
async fn full_tracker_sync_walks_its_own_step_list() {
    let h = harness(StubForge::default(), populated_tracker()).await;
    let mut rx = h.hub.subscribe("op-2").await;

    h.coordinator.start_full_sync(
        "op-2",
        SyncTarget::Tracker {
            key: "ENG".to_string(),
        },
        None,
    );
    let events = collect_run(&mut rx).await;

    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    assert_eq!(Account::find().count(&*h.db).await.unwrap(), 1);
    assert_eq!(Issue::find().count(&*h.db).await.unwrap(), 2);
    assert_eq!(IssueLink::find().count(&*h.db).await.unwrap(), 1);
    assert_eq!(Attachment::find().count(&*h.db).await.unwrap(), 1);

    let project = Project::find_by_id(3).one(&*h.db).await.unwrap().unwrap();
    assert_eq!(project.status, SyncState::Completed);

    // The attachments step marked both issues processed (ENG-2 had zero
    // attachments, which still counts as success).
    let unprocessed = basin::store::tracker::unprocessed_issues(&h.db, 3)
        .await
        .unwrap();
    assert!(unprocessed.is_empty());

    // No forge steps leaked into a tracker run.
    assert!(events.iter().all(|e| e.step != Some(SyncStep::Commits)));
    let _ = &h.tracker;
}

#[tokio::test]
async fn full_workspace_sync_walks_its_own_step_list() {
    let workspace = StubWorkspace {
        workspace: Some(WorkspaceRecord {
            id: "DOCS".to_string(),
            name: "Documentation".to_string(),
            description: None,
        }),
        pages: vec![
            PageRecord {
                id: "p1".to_string(),
                workspace_id: "DOCS".to_string(),
                title: "Home".to_string(),
                version: 3,
                author: Some("u1".to_string()),
                created_at: None,
                updated_at: None,
            },
            PageRecord {
                id: "p2".to_string(),
                workspace_id: "DOCS".to_string(),
                title: "Runbook".to_string(),
                version: 1,
                author: None,
                created_at: None,
                updated_at: None,
            },
        ],
        users: vec![WorkspaceUserRecord {
            id: "u1".to_string(),
            workspace_id: "DOCS".to_string(),
            display_name: "Dev".to_string(),
            email: None,
        }],
    };
    let h = harness_with_workspace(StubForge::default(), StubTracker::default(), workspace).await;
    let mut rx = h.hub.subscribe("op-3").await;

    h.coordinator.start_full_sync(
        "op-3",
        SyncTarget::Workspace {
            key: "DOCS".to_string(),
        },
        None,
    );
    let events = collect_run(&mut rx).await;

    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    assert_eq!(Page::find().count(&*h.db).await.unwrap(), 2);
    assert_eq!(WorkspaceUser::find().count(&*h.db).await.unwrap(), 1);

    let workspace = Workspace::find_by_id("DOCS")
        .one(&*h.db)
        .await
        .unwrap()
        .expect("workspace exists");
    assert_eq!(workspace.status, SyncState::Completed);
    assert!(workspace.last_synced_at.is_some());
}

#[tokio::test]
async fn second_full_sync_saves_nothing_new() {
    let h = harness(populated_forge(), StubTracker::default()).await;

    let mut rx = h.hub.subscribe("op-1").await;
    h.coordinator.start_full_sync("op-1", forge_target(), None);
    collect_run(&mut rx).await;

    let mut rx = h.hub.subscribe("op-1").await;
    h.coordinator.start_full_sync("op-1", forge_target(), None);
    let events = collect_run(&mut rx).await;

    assert_eq!(events.last().map(|e| e.kind), Some(ProgressKind::Completed));

    let commits_count = events
        .iter()
        .filter(|e| e.step == Some(SyncStep::Commits))
        .find_map(|e| e.counts)
        .expect("commits step reports counts");
    assert_eq!(commits_count.total_fetched, 3);
    assert_eq!(commits_count.saved, 0);
    assert_eq!(commits_count.skipped, 3);

    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 3);
}
