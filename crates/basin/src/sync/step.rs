//! Sync steps and per-source step ordering.
//!
//! Step order is plain data: each source has an explicit ordered list, and
//! "resume from step S" is an index lookup into that list. Nothing here
//! relies on enum discriminant ordering.

use serde::{Deserialize, Serialize};

/// One named phase of a full sync, operating over one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    Metadata,
    Commits,
    PullRequests,
    Issues,
    Comments,
    Reviews,
    FileChanges,
    Users,
    IssueLinks,
    Attachments,
    Pages,
    WorkspaceUsers,
    /// Terminal marker; never itself executed.
    Completed,
}

impl SyncStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStep::Metadata => "metadata",
            SyncStep::Commits => "commits",
            SyncStep::PullRequests => "pull_requests",
            SyncStep::Issues => "issues",
            SyncStep::Comments => "comments",
            SyncStep::Reviews => "reviews",
            SyncStep::FileChanges => "file_changes",
            SyncStep::Users => "users",
            SyncStep::IssueLinks => "issue_links",
            SyncStep::Attachments => "attachments",
            SyncStep::Pages => "pages",
            SyncStep::WorkspaceUsers => "workspace_users",
            SyncStep::Completed => "completed",
        }
    }

    /// Parse a step name as used on the wire and the CLI.
    #[must_use]
    pub fn parse(name: &str) -> Option<SyncStep> {
        let step = match name {
            "metadata" => SyncStep::Metadata,
            "commits" => SyncStep::Commits,
            "pull_requests" => SyncStep::PullRequests,
            "issues" => SyncStep::Issues,
            "comments" => SyncStep::Comments,
            "reviews" => SyncStep::Reviews,
            "file_changes" => SyncStep::FileChanges,
            "users" => SyncStep::Users,
            "issue_links" => SyncStep::IssueLinks,
            "attachments" => SyncStep::Attachments,
            "pages" => SyncStep::Pages,
            "workspace_users" => SyncStep::WorkspaceUsers,
            "completed" => SyncStep::Completed,
            _ => return None,
        };
        Some(step)
    }
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data source a sync run crawls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    Forge,
    Tracker,
    Workspace,
}

/// Ordered steps for a forge (code host) sync.
pub const FORGE_STEPS: &[SyncStep] = &[
    SyncStep::Metadata,
    SyncStep::Commits,
    SyncStep::PullRequests,
    SyncStep::Issues,
    SyncStep::Comments,
    SyncStep::Reviews,
    SyncStep::FileChanges,
    SyncStep::Completed,
];

/// Ordered steps for a tracker sync.
pub const TRACKER_STEPS: &[SyncStep] = &[
    SyncStep::Metadata,
    SyncStep::Users,
    SyncStep::Issues,
    SyncStep::IssueLinks,
    SyncStep::Attachments,
    SyncStep::Completed,
];

/// Ordered steps for a workspace sync.
pub const WORKSPACE_STEPS: &[SyncStep] = &[
    SyncStep::Metadata,
    SyncStep::Pages,
    SyncStep::WorkspaceUsers,
    SyncStep::Completed,
];

impl SyncSource {
    /// The full ordered step list for this source, terminal marker included.
    #[must_use]
    pub fn steps(self) -> &'static [SyncStep] {
        match self {
            SyncSource::Forge => FORGE_STEPS,
            SyncSource::Tracker => TRACKER_STEPS,
            SyncSource::Workspace => WORKSPACE_STEPS,
        }
    }

    /// Position of `step` within this source's list, if it belongs to it.
    #[must_use]
    pub fn position(self, step: SyncStep) -> Option<usize> {
        self.steps().iter().position(|s| *s == step)
    }

    /// The executable steps at or after `start`, excluding the terminal
    /// marker. `None` if `start` does not belong to this source.
    #[must_use]
    pub fn steps_from(self, start: SyncStep) -> Option<&'static [SyncStep]> {
        let begin = self.position(start)?;
        let steps = self.steps();
        // Completed is always last and never executed.
        let end = steps.len() - 1;
        Some(&steps[begin.min(end)..end])
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncSource::Forge => "forge",
            SyncSource::Tracker => "tracker",
            SyncSource::Workspace => "workspace",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<SyncSource> {
        match name {
            "forge" => Some(SyncSource::Forge),
            "tracker" => Some(SyncSource::Tracker),
            "workspace" => Some(SyncSource::Workspace),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
