//! Tracker API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::retry::with_retry;
use crate::source::{
    self, AccountRecord, AttachmentRecord, HostPacer, IssueLinkRecord, IssueRecord, ProjectRecord,
    SourceError, TrackerApi,
};

use super::convert;
use super::types::{TrackerAttachment, TrackerIssue, TrackerIssueLink, TrackerProject, TrackerUser};

/// Request timeout for tracker calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracker REST client.
///
/// List endpoints are page-number style with empty-page termination, paced
/// per host like the forge client. Authentication is basic-auth, which the
/// tracker requires for API tokens.
#[derive(Clone)]
pub struct TrackerClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    auth_header: String,
    page_size: u32,
    pacer: HostPacer,
}

impl TrackerClient {
    /// Create a new tracker client.
    ///
    /// `credentials` is the pre-encoded basic-auth value (`user:token` in
    /// base64), injected by configuration; this client treats it as opaque.
    pub fn new(
        host: &str,
        credentials: &str,
        page_size: u32,
        page_delay: Duration,
    ) -> Result<Self, SourceError> {
        url::Url::parse(host)
            .map_err(|e| SourceError::internal(format!("invalid tracker host {host:?}: {e}")))?;
        let transport = ReqwestTransport::with_timeout(REQUEST_TIMEOUT)
            .map_err(|e| SourceError::internal(e.to_string()))?;
        Ok(Self::with_transport(
            host,
            credentials,
            page_size,
            page_delay,
            Arc::new(transport),
        ))
    }

    /// Create a client over an explicit transport (used by tests).
    pub fn with_transport(
        host: &str,
        credentials: &str,
        page_size: u32,
        page_delay: Duration,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
            page_size,
            pacer: HostPacer::new(page_delay),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> source::Result<T> {
        let url = format!("{}/rest/api/2{}", self.host, path);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "basin".to_string()),
                ("Authorization".to_string(), self.auth_header.clone()),
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
impl TrackerApi for TrackerClient {
    async fn get_project(&self, key: &str) -> source::Result<ProjectRecord> {
        self.pacer.wait().await;
        let path = format!("/projects/{key}");
        let project: TrackerProject =
            with_retry(|| self.get(&path), "get project").await?;
        Ok(convert::to_project_record(&project))
    }

    async fn list_users(&self, project_id: i64, key: &str) -> source::Result<Vec<AccountRecord>> {
        let path = format!("/projects/{key}/users");
        let users: Vec<TrackerUser> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(users
            .iter()
            .map(|u| convert::to_account_record(u, project_id))
            .collect())
    }

    async fn list_issues(&self, project_id: i64, key: &str) -> source::Result<Vec<IssueRecord>> {
        let path = format!("/projects/{key}/issues");
        let issues: Vec<TrackerIssue> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(issues
            .iter()
            .map(|i| convert::to_issue_record(i, project_id))
            .collect())
    }

    async fn list_issue_links(
        &self,
        project_id: i64,
        key: &str,
    ) -> source::Result<Vec<IssueLinkRecord>> {
        let path = format!("/projects/{key}/issue_links");
        let links: Vec<TrackerIssueLink> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(links
            .iter()
            .map(|l| convert::to_issue_link_record(l, project_id))
            .collect())
    }

    async fn list_attachments(
        &self,
        issue_id: i64,
        issue_key: &str,
    ) -> source::Result<Vec<AttachmentRecord>> {
        let path = format!("/issues/{issue_key}/attachments");
        let attachments: Vec<TrackerAttachment> =
            source::fetch_pages(&self.pacer, |page| self.get_page(&path, page)).await?;
        Ok(attachments
            .iter()
            .map(|a| convert::to_attachment_record(a, issue_id))
            .collect())
    }
}
