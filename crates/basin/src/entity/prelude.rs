//! Common re-exports for convenient entity usage.

pub use super::account::{
    ActiveModel as AccountActiveModel, Column as AccountColumn, Entity as Account,
    Model as AccountModel,
};
pub use super::attachment::{
    ActiveModel as AttachmentActiveModel, Column as AttachmentColumn, Entity as Attachment,
    Model as AttachmentModel,
};
pub use super::comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comment,
    Model as CommentModel,
};
pub use super::commit::{
    ActiveModel as CommitActiveModel, Column as CommitColumn, Entity as Commit,
    Model as CommitModel,
};
pub use super::file_change::{
    ActiveModel as FileChangeActiveModel, Column as FileChangeColumn, Entity as FileChange,
    Model as FileChangeModel,
};
pub use super::issue::{
    ActiveModel as IssueActiveModel, Column as IssueColumn, Entity as Issue, Model as IssueModel,
};
pub use super::issue_link::{
    ActiveModel as IssueLinkActiveModel, Column as IssueLinkColumn, Entity as IssueLink,
    Model as IssueLinkModel,
};
pub use super::page::{
    ActiveModel as PageActiveModel, Column as PageColumn, Entity as Page, Model as PageModel,
};
pub use super::project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as Project,
    Model as ProjectModel,
};
pub use super::pull_request::{
    ActiveModel as PullRequestActiveModel, Column as PullRequestColumn, Entity as PullRequest,
    Model as PullRequestModel,
};
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::review::{
    ActiveModel as ReviewActiveModel, Column as ReviewColumn, Entity as Review,
    Model as ReviewModel,
};
pub use super::sync_state::SyncState;
pub use super::workspace::{
    ActiveModel as WorkspaceActiveModel, Column as WorkspaceColumn, Entity as Workspace,
    Model as WorkspaceModel,
};
pub use super::workspace_user::{
    ActiveModel as WorkspaceUserActiveModel, Column as WorkspaceUserColumn,
    Entity as WorkspaceUser, Model as WorkspaceUserModel,
};
