//! Initial migration to create the basin database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_repositories(manager).await?;
        self.create_commits(manager).await?;
        self.create_pull_requests(manager).await?;
        self.create_projects(manager).await?;
        self.create_issues(manager).await?;
        self.create_reviews(manager).await?;
        self.create_comments(manager).await?;
        self.create_file_changes(manager).await?;
        self.create_accounts(manager).await?;
        self.create_issue_links(manager).await?;
        self.create_attachments(manager).await?;
        self.create_workspaces(manager).await?;
        self.create_pages(manager).await?;
        self.create_workspace_users(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first to satisfy foreign keys.
        for table in [
            WorkspaceUsers::Table.into_iden(),
            Pages::Table.into_iden(),
            Workspaces::Table.into_iden(),
            Attachments::Table.into_iden(),
            IssueLinks::Table.into_iden(),
            Accounts::Table.into_iden(),
            FileChanges::Table.into_iden(),
            Comments::Table.into_iden(),
            Reviews::Table.into_iden(),
            Issues::Table.into_iden(),
            Projects::Table.into_iden(),
            PullRequests::Table.into_iden(),
            Commits::Table.into_iden(),
            Repositories::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

impl Migration {
    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Repositories::Owner).string().not_null())
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::Description).text().null())
                    .col(
                        ColumnDef::new(Repositories::DefaultBranch)
                            .string()
                            .not_null()
                            .default("main"),
                    )
                    .col(
                        ColumnDef::new(Repositories::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Repositories::LastSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Repositories::PushedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key used by webhook resolution.
        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_owner_name")
                    .table(Repositories::Table)
                    .col(Repositories::Owner)
                    .col(Repositories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_commits(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Commits::Sha)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Commits::RepositoryId).big_integer().not_null())
                    .col(ColumnDef::new(Commits::AuthorName).string().null())
                    .col(ColumnDef::new(Commits::AuthorEmail).string().null())
                    .col(ColumnDef::new(Commits::Message).text().not_null())
                    .col(
                        ColumnDef::new(Commits::CommittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Commits::Additions).integer().null())
                    .col(ColumnDef::new(Commits::Deletions).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_repository")
                            .from(Commits::Table, Commits::RepositoryId)
                            .to(Repositories::Table, Repositories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commits_repository")
                    .table(Commits::Table)
                    .col(Commits::RepositoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_pull_requests(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PullRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PullRequests::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::RepositoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PullRequests::Number).integer().not_null())
                    .col(ColumnDef::new(PullRequests::Title).string().not_null())
                    .col(ColumnDef::new(PullRequests::Body).text().null())
                    .col(ColumnDef::new(PullRequests::State).string().not_null())
                    .col(ColumnDef::new(PullRequests::Author).string().null())
                    .col(
                        ColumnDef::new(PullRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::MergedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_repository")
                            .from(PullRequests::Table, PullRequests::RepositoryId)
                            .to(Repositories::Table, Repositories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unprocessed-children scans filter on (repository_id, processed_at).
        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_repo_processed")
                    .table(PullRequests::Table)
                    .col(PullRequests::RepositoryId)
                    .col(PullRequests::ProcessedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_projects(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Key).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).text().null())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Projects::LastSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_key")
                    .table(Projects::Table)
                    .col(Projects::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_issues(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Issues::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Issues::RepositoryId).big_integer().null())
                    .col(ColumnDef::new(Issues::ProjectId).big_integer().null())
                    .col(ColumnDef::new(Issues::Number).integer().null())
                    .col(ColumnDef::new(Issues::Key).string().null())
                    .col(ColumnDef::new(Issues::Title).string().not_null())
                    .col(ColumnDef::new(Issues::Body).text().null())
                    .col(ColumnDef::new(Issues::State).string().not_null())
                    .col(ColumnDef::new(Issues::Author).string().null())
                    .col(
                        ColumnDef::new(Issues::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Issues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Issues::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Issues::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_repository")
                            .from(Issues::Table, Issues::RepositoryId)
                            .to(Repositories::Table, Repositories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_project")
                            .from(Issues::Table, Issues::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_repo_processed")
                    .table(Issues::Table)
                    .col(Issues::RepositoryId)
                    .col(Issues::ProcessedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_project_processed")
                    .table(Issues::Table)
                    .col(Issues::ProjectId)
                    .col(Issues::ProcessedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_reviews(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reviews::PullRequestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reviews::Author).string().null())
                    .col(ColumnDef::new(Reviews::State).string().not_null())
                    .col(ColumnDef::new(Reviews::Body).text().null())
                    .col(
                        ColumnDef::new(Reviews::SubmittedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_pull_request")
                            .from(Reviews::Table, Reviews::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_pull_request")
                    .table(Reviews::Table)
                    .col(Reviews::PullRequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_comments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::PullRequestId).big_integer().null())
                    .col(ColumnDef::new(Comments::IssueId).big_integer().null())
                    .col(ColumnDef::new(Comments::Author).string().null())
                    .col(ColumnDef::new(Comments::Body).text().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Comments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_pull_request")
                            .from(Comments::Table, Comments::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_issue")
                            .from(Comments::Table, Comments::IssueId)
                            .to(Issues::Table, Issues::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_pull_request")
                    .table(Comments::Table)
                    .col(Comments::PullRequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_issue")
                    .table(Comments::Table)
                    .col(Comments::IssueId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_file_changes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FileChanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FileChanges::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FileChanges::PullRequestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FileChanges::Path).string().not_null())
                    .col(ColumnDef::new(FileChanges::Status).string().not_null())
                    .col(
                        ColumnDef::new(FileChanges::Additions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FileChanges::Deletions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_changes_pull_request")
                            .from(FileChanges::Table, FileChanges::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_changes_pull_request")
                    .table(FileChanges::Table)
                    .col(FileChanges::PullRequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_accounts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::ProjectId).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(ColumnDef::new(Accounts::Email).string().null())
                    .col(
                        ColumnDef::new(Accounts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_project")
                            .from(Accounts::Table, Accounts::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_issue_links(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueLinks::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IssueLinks::ProjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueLinks::SourceIssueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueLinks::TargetIssueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IssueLinks::LinkType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_links_project")
                            .from(IssueLinks::Table, IssueLinks::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_attachments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attachments::IssueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attachments::Filename).string().not_null())
                    .col(ColumnDef::new(Attachments::MimeType).string().null())
                    .col(ColumnDef::new(Attachments::Size).big_integer().null())
                    .col(ColumnDef::new(Attachments::Author).string().null())
                    .col(
                        ColumnDef::new(Attachments::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attachments_issue")
                            .from(Attachments::Table, Attachments::IssueId)
                            .to(Issues::Table, Issues::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attachments_issue")
                    .table(Attachments::Table)
                    .col(Attachments::IssueId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_workspaces(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::Name).string().not_null())
                    .col(ColumnDef::new(Workspaces::Description).text().null())
                    .col(
                        ColumnDef::new(Workspaces::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Workspaces::LastSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_pages(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pages::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Pages::WorkspaceId).string().not_null())
                    .col(ColumnDef::new(Pages::Title).string().not_null())
                    .col(
                        ColumnDef::new(Pages::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Pages::Author).string().null())
                    .col(
                        ColumnDef::new(Pages::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Pages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pages_workspace")
                            .from(Pages::Table, Pages::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pages_workspace")
                    .table(Pages::Table)
                    .col(Pages::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_workspace_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkspaceUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkspaceUsers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceUsers::WorkspaceId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceUsers::DisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkspaceUsers::Email).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_users_workspace")
                            .from(WorkspaceUsers::Table, WorkspaceUsers::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repositories")]
enum Repositories {
    Table,
    Id,
    Owner,
    Name,
    Description,
    DefaultBranch,
    Status,
    LastSyncedAt,
    CreatedAt,
    UpdatedAt,
    PushedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "commits")]
enum Commits {
    Table,
    Sha,
    RepositoryId,
    AuthorName,
    AuthorEmail,
    Message,
    CommittedAt,
    Additions,
    Deletions,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_requests")]
enum PullRequests {
    Table,
    Id,
    RepositoryId,
    Number,
    Title,
    Body,
    State,
    Author,
    CreatedAt,
    UpdatedAt,
    MergedAt,
    ClosedAt,
    ProcessedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "issues")]
enum Issues {
    Table,
    Id,
    RepositoryId,
    ProjectId,
    Number,
    Key,
    Title,
    Body,
    State,
    Author,
    CreatedAt,
    UpdatedAt,
    ClosedAt,
    ProcessedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "reviews")]
enum Reviews {
    Table,
    Id,
    PullRequestId,
    Author,
    State,
    Body,
    SubmittedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "comments")]
enum Comments {
    Table,
    Id,
    PullRequestId,
    IssueId,
    Author,
    Body,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "file_changes")]
enum FileChanges {
    Table,
    Id,
    PullRequestId,
    Path,
    Status,
    Additions,
    Deletions,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "projects")]
enum Projects {
    Table,
    Id,
    Key,
    Name,
    Description,
    Status,
    LastSyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "accounts")]
enum Accounts {
    Table,
    Id,
    ProjectId,
    DisplayName,
    Email,
    Active,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "issue_links")]
enum IssueLinks {
    Table,
    Id,
    ProjectId,
    SourceIssueId,
    TargetIssueId,
    LinkType,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "attachments")]
enum Attachments {
    Table,
    Id,
    IssueId,
    Filename,
    MimeType,
    Size,
    Author,
    CreatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "workspaces")]
enum Workspaces {
    Table,
    Id,
    Name,
    Description,
    Status,
    LastSyncedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pages")]
enum Pages {
    Table,
    Id,
    WorkspaceId,
    Title,
    Version,
    Author,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "workspace_users")]
enum WorkspaceUsers {
    Table,
    Id,
    WorkspaceId,
    DisplayName,
    Email,
}
