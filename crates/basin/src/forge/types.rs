//! Wire types for the forge REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeRepo {
    pub id: i64,
    pub owner: ForgeOwner,
    pub name: String,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeCommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeCommitDetail {
    pub message: String,
    pub author: Option<ForgeCommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeCommitStats {
    pub additions: i32,
    pub deletions: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeCommit {
    pub sha: String,
    pub commit: ForgeCommitDetail,
    pub stats: Option<ForgeCommitStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgePull {
    pub id: i64,
    pub number: i32,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub user: Option<ForgeOwner>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// An issue as listed by the forge. The list endpoint also returns pull
/// requests; those rows carry a `pull_request` stub and are filtered out.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeIssue {
    pub id: i64,
    pub number: i32,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub user: Option<ForgeOwner>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl ForgeIssue {
    /// Whether this row is actually a pull request in disguise.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeComment {
    pub id: i64,
    pub user: Option<ForgeOwner>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeReview {
    pub id: i64,
    pub user: Option<ForgeOwner>,
    pub state: String,
    pub body: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgeFile {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: i32,
    #[serde(default)]
    pub deletions: i32,
}
