//! Conversion from tracker wire types to canonical records.

use crate::source::{AccountRecord, AttachmentRecord, IssueLinkRecord, IssueRecord, ProjectRecord};

use super::types::{TrackerAttachment, TrackerIssue, TrackerIssueLink, TrackerProject, TrackerUser};

pub fn to_project_record(project: &TrackerProject) -> ProjectRecord {
    ProjectRecord {
        id: project.id,
        key: project.key.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
    }
}

pub fn to_account_record(user: &TrackerUser, project_id: i64) -> AccountRecord {
    AccountRecord {
        id: user.account_id.clone(),
        project_id,
        display_name: user.display_name.clone(),
        email: user.email_address.clone(),
        active: user.active,
    }
}

pub fn to_issue_record(issue: &TrackerIssue, project_id: i64) -> IssueRecord {
    IssueRecord {
        id: issue.id,
        repository_id: None,
        project_id: Some(project_id),
        number: None,
        key: Some(issue.key.clone()),
        title: issue.summary.clone(),
        body: issue.description.clone(),
        state: issue.status.name.clone(),
        author: issue.reporter.as_ref().map(|u| u.display_name.clone()),
        created_at: issue.created,
        updated_at: issue.updated,
        closed_at: issue.resolution_date,
    }
}

pub fn to_issue_link_record(link: &TrackerIssueLink, project_id: i64) -> IssueLinkRecord {
    IssueLinkRecord {
        id: link.id,
        project_id,
        source_issue_id: link.source_issue_id,
        target_issue_id: link.target_issue_id,
        link_type: link.link_type.clone(),
    }
}

pub fn to_attachment_record(attachment: &TrackerAttachment, issue_id: i64) -> AttachmentRecord {
    AttachmentRecord {
        id: attachment.id,
        issue_id,
        filename: attachment.filename.clone(),
        mime_type: attachment.mime_type.clone(),
        size: attachment.size,
        author: attachment.author.as_ref().map(|u| u.display_name.clone()),
        created_at: attachment.created,
    }
}
