//! Wire types for the tracker REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerProject {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerUser {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerStatus {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerIssue {
    pub id: i64,
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: TrackerStatus,
    pub reporter: Option<TrackerUser>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    #[serde(rename = "resolutionDate")]
    pub resolution_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerIssueLink {
    pub id: i64,
    #[serde(rename = "sourceIssueId")]
    pub source_issue_id: i64,
    #[serde(rename = "targetIssueId")]
    pub target_issue_id: i64,
    #[serde(rename = "linkType")]
    pub link_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerAttachment {
    pub id: i64,
    pub filename: String,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub author: Option<TrackerUser>,
    pub created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_defaults_to_active_when_field_is_absent() {
        let json = r#"{"accountId": "u1", "displayName": "Dev"}"#;
        let user: TrackerUser = serde_json::from_str(json).unwrap();
        assert!(user.active);
        assert!(user.email_address.is_none());
    }

    #[test]
    fn issue_parses_camel_case_fields() {
        let json = r#"{
            "id": 9, "key": "ENG-204", "summary": "migrate schema",
            "status": {"name": "In Progress"},
            "resolutionDate": "2026-02-01T00:00:00Z"
        }"#;
        let issue: TrackerIssue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, "ENG-204");
        assert_eq!(issue.status.name, "In Progress");
        assert!(issue.resolution_date.is_some());
    }
}
