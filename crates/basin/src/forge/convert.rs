//! Conversion from forge wire types to canonical records.

use crate::source::{
    CommentRecord, CommitRecord, FileChangeRecord, IssueRecord, PullRequestRecord,
    RepositoryRecord, ReviewRecord,
};

use super::types::{
    ForgeComment, ForgeCommit, ForgeFile, ForgeIssue, ForgePull, ForgeRepo, ForgeReview,
};

pub fn to_repository_record(repo: &ForgeRepo) -> RepositoryRecord {
    RepositoryRecord {
        id: repo.id,
        owner: repo.owner.login.clone(),
        name: repo.name.clone(),
        description: repo.description.clone(),
        default_branch: repo
            .default_branch
            .clone()
            .unwrap_or_else(|| "main".to_string()),
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        pushed_at: repo.pushed_at,
    }
}

pub fn to_commit_record(commit: &ForgeCommit, repository_id: i64) -> CommitRecord {
    let author = commit.commit.author.as_ref();
    CommitRecord {
        sha: commit.sha.clone(),
        repository_id,
        author_name: author.and_then(|a| a.name.clone()),
        author_email: author.and_then(|a| a.email.clone()),
        message: commit.commit.message.clone(),
        committed_at: author.and_then(|a| a.date),
        additions: commit.stats.as_ref().map(|s| s.additions),
        deletions: commit.stats.as_ref().map(|s| s.deletions),
    }
}

pub fn to_pull_request_record(pull: &ForgePull, repository_id: i64) -> PullRequestRecord {
    PullRequestRecord {
        id: pull.id,
        repository_id,
        number: pull.number,
        title: pull.title.clone(),
        body: pull.body.clone(),
        state: pull.state.clone(),
        author: pull.user.as_ref().map(|u| u.login.clone()),
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        merged_at: pull.merged_at,
        closed_at: pull.closed_at,
    }
}

pub fn to_issue_record(issue: &ForgeIssue, repository_id: i64) -> IssueRecord {
    IssueRecord {
        id: issue.id,
        repository_id: Some(repository_id),
        project_id: None,
        number: Some(issue.number),
        key: None,
        title: issue.title.clone(),
        body: issue.body.clone(),
        state: issue.state.clone(),
        author: issue.user.as_ref().map(|u| u.login.clone()),
        created_at: issue.created_at,
        updated_at: issue.updated_at,
        closed_at: issue.closed_at,
    }
}

pub fn to_pull_comment_record(comment: &ForgeComment, pull_request_id: i64) -> CommentRecord {
    CommentRecord {
        id: comment.id,
        pull_request_id: Some(pull_request_id),
        issue_id: None,
        author: comment.user.as_ref().map(|u| u.login.clone()),
        body: comment.body.clone().unwrap_or_default(),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub fn to_issue_comment_record(comment: &ForgeComment, issue_id: i64) -> CommentRecord {
    CommentRecord {
        id: comment.id,
        pull_request_id: None,
        issue_id: Some(issue_id),
        author: comment.user.as_ref().map(|u| u.login.clone()),
        body: comment.body.clone().unwrap_or_default(),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub fn to_review_record(review: &ForgeReview, pull_request_id: i64) -> ReviewRecord {
    ReviewRecord {
        id: review.id,
        pull_request_id,
        author: review.user.as_ref().map(|u| u.login.clone()),
        state: review.state.clone(),
        body: review.body.clone(),
        submitted_at: review.submitted_at,
    }
}

pub fn to_file_change_record(file: &ForgeFile, pull_request_id: i64) -> FileChangeRecord {
    FileChangeRecord {
        pull_request_id,
        path: file.filename.clone(),
        status: file.status.clone(),
        additions: file.additions,
        deletions: file.deletions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::types::{ForgeCommitAuthor, ForgeCommitDetail, ForgeOwner};

    #[test]
    fn commit_conversion_flattens_nested_fields() {
        let commit = ForgeCommit {
            sha: "abc".to_string(),
            commit: ForgeCommitDetail {
                message: "fix".to_string(),
                author: Some(ForgeCommitAuthor {
                    name: Some("Dev".to_string()),
                    email: Some("dev@example.com".to_string()),
                    date: None,
                }),
            },
            stats: None,
        };

        let record = to_commit_record(&commit, 7);
        assert_eq!(record.repository_id, 7);
        assert_eq!(record.author_name.as_deref(), Some("Dev"));
        assert!(record.additions.is_none());
    }

    #[test]
    fn issue_conversion_sets_forge_parent_only() {
        let issue = ForgeIssue {
            id: 3,
            number: 12,
            title: "bug".to_string(),
            body: None,
            state: "open".to_string(),
            user: Some(ForgeOwner {
                login: "reporter".to_string(),
            }),
            created_at: None,
            updated_at: None,
            closed_at: None,
            pull_request: None,
        };

        let record = to_issue_record(&issue, 7);
        assert_eq!(record.repository_id, Some(7));
        assert_eq!(record.project_id, None);
        assert_eq!(record.number, Some(12));
        assert_eq!(record.author.as_deref(), Some("reporter"));
    }
}
