//! Shared infrastructure for the upstream source clients.
//!
//! This module defines the canonical record types, the per-source client
//! traits, the paginated crawl loops, and the fixed inter-request pacing
//! used by every client.
//!
//! # Example
//!
//! ```ignore
//! use basin::source::{ForgeApi, SourceError};
//!
//! async fn sync_commits<C: ForgeApi>(client: &C) -> Result<(), SourceError> {
//!     let repo = client.get_repository("acme", "widget").await?;
//!     let commits = client.list_commits(repo.id, "acme", "widget").await?;
//!     println!("{} commits", commits.len());
//!     Ok(())
//! }
//! ```

mod errors;
mod pacing;
pub mod paginate;
mod types;

pub use errors::{Result, SourceError};
pub use pacing::HostPacer;
pub use paginate::{TokenPage, fetch_pages, fetch_pages_streaming, fetch_token_pages};
pub use types::{
    AccountRecord, AttachmentRecord, CommentRecord, CommitRecord, FileChangeRecord, ForgeApi,
    IssueLinkRecord, IssueRecord, PageRecord, ProjectRecord, PullRequestRecord, RepositoryRecord,
    ReviewRecord, TrackerApi, WorkspaceApi, WorkspaceRecord, WorkspaceUserRecord,
};
