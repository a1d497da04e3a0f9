//! Typed webhook payloads.
//!
//! Pull-request and issue events reuse the forge wire types; the push
//! payload has its own flattened commit shape.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::forge::types::{ForgeIssue, ForgeOwner, ForgePull};

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub id: i64,
    pub name: String,
    pub owner: ForgeOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushCommit {
    pub id: String,
    pub message: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub author: Option<PushAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Full ref of the push (e.g. `refs/heads/main`).
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: RepositoryRef,
    #[serde(default)]
    pub commits: Vec<PushCommit>,
}

impl PushEvent {
    /// Branch name, if the ref is a branch ref.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.git_ref.strip_prefix("refs/heads/")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: ForgePull,
    pub repository: RepositoryRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: ForgeIssue,
    pub repository: RepositoryRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_event_extracts_branch_from_ref() {
        let json = r#"{
            "ref": "refs/heads/main",
            "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}},
            "commits": [{"id": "abc", "message": "fix"}]
        }"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.branch(), Some("main"));
        assert_eq!(event.commits.len(), 1);
    }

    #[test]
    fn tag_push_has_no_branch() {
        let json = r#"{
            "ref": "refs/tags/v1.0",
            "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
        }"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.branch(), None);
        assert!(event.commits.is_empty());
    }

    #[test]
    fn pull_request_event_reuses_forge_wire_type() {
        let json = r#"{
            "action": "opened",
            "pull_request": {"id": 5, "number": 2, "title": "t", "state": "open"},
            "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
        }"#;
        let event: PullRequestEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action, "opened");
        assert_eq!(event.pull_request.number, 2);
    }
}
