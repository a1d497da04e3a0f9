//! Wire types for the workspace REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Cursor-paged list envelope.
///
/// The workspace API does not use page numbers: each response carries an
/// opaque cursor for the next request and an explicit last-page flag.
#[derive(Debug, Clone, Deserialize)]
pub struct CursorPage<T> {
    pub results: Vec<T>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub last: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSpace {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacePageVersion {
    pub number: i32,
    #[serde(rename = "authorId")]
    pub author_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacePage {
    pub id: String,
    pub title: String,
    pub version: Option<WorkspacePageVersion>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceMember {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_page_parses_envelope() {
        let json = r#"{
            "results": [{"id": "p1", "title": "Home"}],
            "nextCursor": "abc",
            "last": false
        }"#;
        let page: CursorPage<WorkspacePage> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert!(!page.last);
    }

    #[test]
    fn last_defaults_to_false_when_absent() {
        let json = r#"{"results": [], "nextCursor": null}"#;
        let page: CursorPage<WorkspaceMember> = serde_json::from_str(json).unwrap();
        assert!(!page.last);
        assert!(page.next_cursor.is_none());
    }
}
