//! Canonical records and client traits for the upstream sources.
//!
//! A canonical record is the source-agnostic, mapped representation of an
//! upstream API object, ready for persistence. Each carries the
//! upstream-assigned identifier, the reference to its parent container, and
//! lifecycle timestamps where the upstream provides them. Conversion into
//! sea-orm active models happens here so that clients and the webhook
//! ingress share one mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use tokio::sync::mpsc;

use crate::entity;
use crate::entity::sync_state::SyncState;

use super::errors::Result;

fn fixed(ts: Option<DateTime<Utc>>) -> Option<sea_orm::prelude::DateTimeWithTimeZone> {
    ts.map(|t| t.fixed_offset())
}

// ─── Forge records ───────────────────────────────────────────────────────────

/// A code-forge repository (parent entity).
#[derive(Debug, Clone)]
pub struct RepositoryRecord {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub default_branch: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl RepositoryRecord {
    /// Get the full name (owner/name).
    #[inline]
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    #[must_use]
    pub fn active_model(&self, status: SyncState) -> entity::repository::ActiveModel {
        entity::repository::ActiveModel {
            id: Set(self.id),
            owner: Set(self.owner.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            default_branch: Set(self.default_branch.clone()),
            status: Set(status),
            last_synced_at: Set(None),
            created_at: Set(fixed(self.created_at)),
            updated_at: Set(fixed(self.updated_at)),
            pushed_at: Set(fixed(self.pushed_at)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub sha: String,
    pub repository_id: i64,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub message: String,
    pub committed_at: Option<DateTime<Utc>>,
    pub additions: Option<i32>,
    pub deletions: Option<i32>,
}

impl CommitRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::commit::ActiveModel {
        entity::commit::ActiveModel {
            sha: Set(self.sha.clone()),
            repository_id: Set(self.repository_id),
            author_name: Set(self.author_name.clone()),
            author_email: Set(self.author_email.clone()),
            message: Set(self.message.clone()),
            committed_at: Set(fixed(self.committed_at)),
            additions: Set(self.additions),
            deletions: Set(self.deletions),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PullRequestRecord {
    pub id: i64,
    pub repository_id: i64,
    pub number: i32,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl PullRequestRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::pull_request::ActiveModel {
        entity::pull_request::ActiveModel {
            id: Set(self.id),
            repository_id: Set(self.repository_id),
            number: Set(self.number),
            title: Set(self.title.clone()),
            body: Set(self.body.clone()),
            state: Set(self.state.clone()),
            author: Set(self.author.clone()),
            created_at: Set(fixed(self.created_at)),
            updated_at: Set(fixed(self.updated_at)),
            merged_at: Set(fixed(self.merged_at)),
            closed_at: Set(fixed(self.closed_at)),
            processed_at: Set(None),
        }
    }
}

/// An issue, forge-side (`repository_id` set) or tracker-side (`project_id`
/// set).
#[derive(Debug, Clone)]
pub struct IssueRecord {
    pub id: i64,
    pub repository_id: Option<i64>,
    pub project_id: Option<i64>,
    pub number: Option<i32>,
    pub key: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl IssueRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::issue::ActiveModel {
        entity::issue::ActiveModel {
            id: Set(self.id),
            repository_id: Set(self.repository_id),
            project_id: Set(self.project_id),
            number: Set(self.number),
            key: Set(self.key.clone()),
            title: Set(self.title.clone()),
            body: Set(self.body.clone()),
            state: Set(self.state.clone()),
            author: Set(self.author.clone()),
            created_at: Set(fixed(self.created_at)),
            updated_at: Set(fixed(self.updated_at)),
            closed_at: Set(fixed(self.closed_at)),
            processed_at: Set(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub id: i64,
    pub pull_request_id: i64,
    pub author: Option<String>,
    pub state: String,
    pub body: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::review::ActiveModel {
        entity::review::ActiveModel {
            id: Set(self.id),
            pull_request_id: Set(self.pull_request_id),
            author: Set(self.author.clone()),
            state: Set(self.state.clone()),
            body: Set(self.body.clone()),
            submitted_at: Set(fixed(self.submitted_at)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: i64,
    pub pull_request_id: Option<i64>,
    pub issue_id: Option<i64>,
    pub author: Option<String>,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::comment::ActiveModel {
        entity::comment::ActiveModel {
            id: Set(self.id),
            pull_request_id: Set(self.pull_request_id),
            issue_id: Set(self.issue_id),
            author: Set(self.author.clone()),
            body: Set(self.body.clone()),
            created_at: Set(fixed(self.created_at)),
            updated_at: Set(fixed(self.updated_at)),
        }
    }
}

/// A changed file within a pull request. The upstream list endpoint assigns
/// no identifier, so the key is synthesized from the pull request and path.
#[derive(Debug, Clone)]
pub struct FileChangeRecord {
    pub pull_request_id: i64,
    pub path: String,
    pub status: String,
    pub additions: i32,
    pub deletions: i32,
}

impl FileChangeRecord {
    #[inline]
    #[must_use]
    pub fn change_key(&self) -> String {
        entity::file_change::Model::change_key(self.pull_request_id, &self.path)
    }

    #[must_use]
    pub fn active_model(&self) -> entity::file_change::ActiveModel {
        entity::file_change::ActiveModel {
            id: Set(self.change_key()),
            pull_request_id: Set(self.pull_request_id),
            path: Set(self.path.clone()),
            status: Set(self.status.clone()),
            additions: Set(self.additions),
            deletions: Set(self.deletions),
        }
    }
}

// ─── Tracker records ─────────────────────────────────────────────────────────

/// A tracker project (parent entity).
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

impl ProjectRecord {
    #[must_use]
    pub fn active_model(&self, status: SyncState) -> entity::project::ActiveModel {
        entity::project::ActiveModel {
            id: Set(self.id),
            key: Set(self.key.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status: Set(status),
            last_synced_at: Set(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: String,
    pub project_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    pub active: bool,
}

impl AccountRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::account::ActiveModel {
        entity::account::ActiveModel {
            id: Set(self.id.clone()),
            project_id: Set(self.project_id),
            display_name: Set(self.display_name.clone()),
            email: Set(self.email.clone()),
            active: Set(self.active),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueLinkRecord {
    pub id: i64,
    pub project_id: i64,
    pub source_issue_id: i64,
    pub target_issue_id: i64,
    pub link_type: String,
}

impl IssueLinkRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::issue_link::ActiveModel {
        entity::issue_link::ActiveModel {
            id: Set(self.id),
            project_id: Set(self.project_id),
            source_issue_id: Set(self.source_issue_id),
            target_issue_id: Set(self.target_issue_id),
            link_type: Set(self.link_type.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentRecord {
    pub id: i64,
    pub issue_id: i64,
    pub filename: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AttachmentRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::attachment::ActiveModel {
        entity::attachment::ActiveModel {
            id: Set(self.id),
            issue_id: Set(self.issue_id),
            filename: Set(self.filename.clone()),
            mime_type: Set(self.mime_type.clone()),
            size: Set(self.size),
            author: Set(self.author.clone()),
            created_at: Set(fixed(self.created_at)),
        }
    }
}

// ─── Workspace records ───────────────────────────────────────────────────────

/// A documentation workspace (parent entity).
#[derive(Debug, Clone)]
pub struct WorkspaceRecord {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl WorkspaceRecord {
    #[must_use]
    pub fn active_model(&self, status: SyncState) -> entity::workspace::ActiveModel {
        entity::workspace::ActiveModel {
            id: Set(self.id.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            status: Set(status),
            last_synced_at: Set(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: String,
    pub workspace_id: String,
    pub title: String,
    pub version: i32,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::page::ActiveModel {
        entity::page::ActiveModel {
            id: Set(self.id.clone()),
            workspace_id: Set(self.workspace_id.clone()),
            title: Set(self.title.clone()),
            version: Set(self.version),
            author: Set(self.author.clone()),
            created_at: Set(fixed(self.created_at)),
            updated_at: Set(fixed(self.updated_at)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceUserRecord {
    pub id: String,
    pub workspace_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl WorkspaceUserRecord {
    #[must_use]
    pub fn active_model(&self) -> entity::workspace_user::ActiveModel {
        entity::workspace_user::ActiveModel {
            id: Set(self.id.clone()),
            workspace_id: Set(self.workspace_id.clone()),
            display_name: Set(self.display_name.clone()),
            email: Set(self.email.clone()),
        }
    }
}

// ─── Client traits ───────────────────────────────────────────────────────────

/// Client for the code forge.
///
/// Implementors handle pagination internally (via [`super::paginate`]) and
/// pace requests with a per-host [`super::HostPacer`]. List operations crawl
/// to completion; a transport or parse error aborts the crawl and surfaces
/// as an error.
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Fetch a single repository by owner and name.
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepositoryRecord>;

    /// List all commits of a repository.
    async fn list_commits(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> Result<Vec<CommitRecord>>;

    /// Stream all commits of a repository through a channel, page by page.
    ///
    /// Returns the number of commits sent. Used for the high-volume commits
    /// step so persistence can run while the crawl is still in flight.
    async fn stream_commits(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
        tx: mpsc::Sender<CommitRecord>,
    ) -> Result<usize>;

    /// List all pull requests of a repository (any state).
    async fn list_pull_requests(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> Result<Vec<PullRequestRecord>>;

    /// List all issues of a repository (any state).
    async fn list_issues(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> Result<Vec<IssueRecord>>;

    /// List all comments on one pull request.
    async fn list_pull_request_comments(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<CommentRecord>>;

    /// List all comments on one issue.
    async fn list_issue_comments(
        &self,
        issue_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<CommentRecord>>;

    /// List all reviews on one pull request.
    async fn list_reviews(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<ReviewRecord>>;

    /// List the changed files of one pull request.
    async fn list_file_changes(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> Result<Vec<FileChangeRecord>>;
}

/// Client for the issue tracker.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Fetch a single project by key.
    async fn get_project(&self, key: &str) -> Result<ProjectRecord>;

    /// List the users visible to a project.
    async fn list_users(&self, project_id: i64, key: &str) -> Result<Vec<AccountRecord>>;

    /// List all issues of a project.
    async fn list_issues(&self, project_id: i64, key: &str) -> Result<Vec<IssueRecord>>;

    /// List all issue links within a project.
    async fn list_issue_links(&self, project_id: i64, key: &str) -> Result<Vec<IssueLinkRecord>>;

    /// List the attachments of one issue.
    async fn list_attachments(
        &self,
        issue_id: i64,
        issue_key: &str,
    ) -> Result<Vec<AttachmentRecord>>;
}

/// Client for the documentation workspace.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Fetch a single workspace by key.
    async fn get_workspace(&self, key: &str) -> Result<WorkspaceRecord>;

    /// List all pages of a workspace.
    async fn list_pages(&self, workspace_id: &str) -> Result<Vec<PageRecord>>;

    /// List the members of a workspace.
    async fn list_users(&self, workspace_id: &str) -> Result<Vec<WorkspaceUserRecord>>;
}
