//! Shared sync types and constants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default page size for upstream list requests.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default fixed delay between requests to the same upstream host.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 250;

/// Default idle timeout for a subscriber's progress channel.
pub const DEFAULT_CHANNEL_TIMEOUT_SECS: u64 = 3_600;

/// The kinds of canonical records basin persists.
///
/// Used to key per-kind counts in a sync result and to route outbound queue
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Repository,
    Commit,
    PullRequest,
    Issue,
    Review,
    Comment,
    FileChange,
    Project,
    Account,
    IssueLink,
    Attachment,
    Workspace,
    Page,
    WorkspaceUser,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Repository => "repository",
            EntityKind::Commit => "commit",
            EntityKind::PullRequest => "pull_request",
            EntityKind::Issue => "issue",
            EntityKind::Review => "review",
            EntityKind::Comment => "comment",
            EntityKind::FileChange => "file_change",
            EntityKind::Project => "project",
            EntityKind::Account => "account",
            EntityKind::IssueLink => "issue_link",
            EntityKind::Attachment => "attachment",
            EntityKind::Workspace => "workspace",
            EntityKind::Page => "page",
            EntityKind::WorkspaceUser => "workspace_user",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one persistence call, aggregated by addition across pages and
/// across entities of the same kind.
///
/// Invariants: `skipped == total_fetched - saved` and `saved <= total_fetched`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCount {
    pub total_fetched: usize,
    pub saved: usize,
    pub skipped: usize,
}

impl SyncCount {
    /// Build a count from a fetch total and the number actually saved.
    ///
    /// # Panics
    /// Panics in debug builds if `saved > total_fetched`.
    #[must_use]
    pub fn new(total_fetched: usize, saved: usize) -> Self {
        debug_assert!(saved <= total_fetched);
        Self {
            total_fetched,
            saved,
            skipped: total_fetched - saved,
        }
    }

    /// A zero count, used when a transient fetch failure is folded into the
    /// aggregate.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_fetched == 0
    }
}

impl std::ops::Add for SyncCount {
    type Output = SyncCount;

    fn add(self, rhs: SyncCount) -> SyncCount {
        SyncCount {
            total_fetched: self.total_fetched + rhs.total_fetched,
            saved: self.saved + rhs.saved,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

impl std::ops::AddAssign for SyncCount {
    fn add_assign(&mut self, rhs: SyncCount) {
        *self = *self + rhs;
    }
}

/// Outcome of one full or partial sync run for a single parent entity.
///
/// Created once the run finishes (success or failure); immutable afterward.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSyncResult {
    /// The parent entity key (e.g. `acme/widget`, `ENG`, `DOCS`).
    pub key: String,
    pub success: bool,
    pub error_message: Option<String>,
    /// Aggregated counts per entity kind.
    pub counts: BTreeMap<EntityKind, SyncCount>,
    /// Total wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl ProjectSyncResult {
    #[must_use]
    pub fn total_saved(&self) -> usize {
        self.counts.values().map(|c| c.saved).sum()
    }

    #[must_use]
    pub fn total_fetched(&self) -> usize {
        self.counts.values().map(|c| c.total_fetched).sum()
    }
}
