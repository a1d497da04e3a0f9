//! Forge API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::retry::with_retry;
use crate::source::{
    self, CommentRecord, CommitRecord, FileChangeRecord, ForgeApi, HostPacer, IssueRecord,
    PullRequestRecord, RepositoryRecord, ReviewRecord, SourceError,
};

use super::convert;
use super::types::{
    ForgeComment, ForgeCommit, ForgeFile, ForgeIssue, ForgePull, ForgeRepo, ForgeReview,
};

/// Request timeout for forge calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Forge REST client.
///
/// Pagination is page-number style with empty-page termination; every page
/// request waits on the shared per-host pacer first, so requests to the
/// forge are never issued closer together than the configured delay.
#[derive(Clone)]
pub struct ForgeClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    page_size: u32,
    pacer: HostPacer,
}

impl ForgeClient {
    /// Create a new forge client.
    ///
    /// # Arguments
    ///
    /// * `host` - Forge base URL (e.g. `https://forge.example.com`)
    /// * `token` - Bearer token
    /// * `page_size` - Items requested per page
    /// * `page_delay` - Fixed minimum delay between requests to this host
    pub fn new(
        host: &str,
        token: &str,
        page_size: u32,
        page_delay: Duration,
    ) -> Result<Self, SourceError> {
        url::Url::parse(host)
            .map_err(|e| SourceError::internal(format!("invalid forge host {host:?}: {e}")))?;
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| SourceError::internal(e.to_string()))?;
        Ok(Self::with_transport(
            host,
            token,
            page_size,
            page_delay,
            Arc::new(transport),
        ))
    }

    /// Create a client over an explicit transport (used by tests).
    pub fn with_transport(
        host: &str,
        token: &str,
        page_size: u32,
        page_delay: Duration,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            page_size,
            pacer: HostPacer::new(page_delay),
        }
    }

    /// Make an authenticated GET request and parse the JSON body.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> source::Result<T> {
        let url = format!("{}{}", self.host, path);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "basin".to_string()),
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ],
            body: Vec::new(),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| SourceError::network(e.to_string()))?;

        match response.status {
            404 => Err(SourceError::not_found(path.to_string())),
            429 => Err(SourceError::RateLimited),
            s if (200..300).contains(&s) => {
                serde_json::from_slice(&response.body).map_err(SourceError::from)
            }
            s => Err(SourceError::api(
                s,
                String::from_utf8_lossy(&response.body).to_string(),
            )),
        }
    }

    /// Fetch one page of a list endpoint, retrying rate-limit responses.
    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        base_path: &str,
        page: u32,
    ) -> source::Result<Vec<T>> {
        let separator = if base_path.contains('?') { '&' } else { '?' };
        let path = format!(
            "{base_path}{separator}page={page}&per_page={}",
            self.page_size
        );
        with_retry(|| self.get::<Vec<T>>(&path), base_path).await
    }
}

#[async_trait]
impl ForgeApi for ForgeClient {
    async fn get_repository(&self, owner: &str, name: &str) -> source::Result<RepositoryRecord> {
        self.pacer.wait().await;
        let path = format!("/repos/{owner}/{name}");
        let repo: ForgeRepo = with_retry(|| self.get(&path), "get repository").await?;
        Ok(convert::to_repository_record(&repo))
    }

    async fn list_commits(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> source::Result<Vec<CommitRecord>> {
        let path = format!("/repos/{owner}/{name}/commits");
        let commits: Vec<ForgeCommit> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(commits
            .iter()
            .map(|c| convert::to_commit_record(c, repository_id))
            .collect())
    }

    async fn stream_commits(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
        tx: mpsc::Sender<CommitRecord>,
    ) -> source::Result<usize> {
        let path = format!("/repos/{owner}/{name}/commits");
        source::fetch_pages_streaming(&self.pacer, tx, |page| {
            let path = path.clone();
            async move {
                let commits: Vec<ForgeCommit> = self.get_page(&path, page).await?;
                Ok(commits
                    .iter()
                    .map(|c| convert::to_commit_record(c, repository_id))
                    .collect())
            }
        })
        .await
    }

    async fn list_pull_requests(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> source::Result<Vec<PullRequestRecord>> {
        let path = format!("/repos/{owner}/{name}/pulls?state=all");
        let pulls: Vec<ForgePull> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(pulls
            .iter()
            .map(|p| convert::to_pull_request_record(p, repository_id))
            .collect())
    }

    async fn list_issues(
        &self,
        repository_id: i64,
        owner: &str,
        name: &str,
    ) -> source::Result<Vec<IssueRecord>> {
        let path = format!("/repos/{owner}/{name}/issues?state=all");
        let issues: Vec<ForgeIssue> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        // The issues endpoint lists pull requests too; drop those rows.
        Ok(issues
            .iter()
            .filter(|i| !i.is_pull_request())
            .map(|i| convert::to_issue_record(i, repository_id))
            .collect())
    }

    async fn list_pull_request_comments(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> source::Result<Vec<CommentRecord>> {
        let path = format!("/repos/{owner}/{name}/pulls/{number}/comments");
        let comments: Vec<ForgeComment> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(comments
            .iter()
            .map(|c| convert::to_pull_comment_record(c, pull_request_id))
            .collect())
    }

    async fn list_issue_comments(
        &self,
        issue_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> source::Result<Vec<CommentRecord>> {
        let path = format!("/repos/{owner}/{name}/issues/{number}/comments");
        let comments: Vec<ForgeComment> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(comments
            .iter()
            .map(|c| convert::to_issue_comment_record(c, issue_id))
            .collect())
    }

    async fn list_reviews(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> source::Result<Vec<ReviewRecord>> {
        let path = format!("/repos/{owner}/{name}/pulls/{number}/reviews");
        let reviews: Vec<ForgeReview> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(reviews
            .iter()
            .map(|r| convert::to_review_record(r, pull_request_id))
            .collect())
    }

    async fn list_file_changes(
        &self,
        pull_request_id: i64,
        owner: &str,
        name: &str,
        number: i32,
    ) -> source::Result<Vec<FileChangeRecord>> {
        let path = format!("/repos/{owner}/{name}/pulls/{number}/files");
        let files: Vec<ForgeFile> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(files
            .iter()
            .map(|f| convert::to_file_change_record(f, pull_request_id))
            .collect())
    }
}
