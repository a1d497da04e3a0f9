//! Workspace API client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpTransport};
use crate::retry::with_retry;
use crate::source::{
    self, HostPacer, PageRecord, SourceError, TokenPage, WorkspaceApi, WorkspaceRecord,
    WorkspaceUserRecord,
};

use super::convert;
use super::types::{CursorPage, WorkspaceMember, WorkspacePage, WorkspaceSpace};

/// Request timeout for workspace calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Workspace REST client.
///
/// List endpoints are cursor-paged: termination is the response's explicit
/// last flag or an absent cursor, never an empty result list.
#[derive(Clone)]
pub struct WorkspaceClient {
    transport: Arc<dyn HttpTransport>,
    host: String,
    token: String,
    page_size: u32,
    pacer: HostPacer,
}

impl WorkspaceClient {
    /// Create a new workspace client.
    pub fn new(
        host: &str,
        token: &str,
        page_size: u32,
        page_delay: Duration,
    ) -> Result<Self, SourceError> {
        url::Url::parse(host)
            .map_err(|e| SourceError::internal(format!("invalid workspace host {host:?}: {e}")))?;
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

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> source::Result<T> {
        let url = format!("{}/wiki/api/v2{}", self.host, path);

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

    /// Fetch one cursor page, retrying rate-limit responses.
    async fn get_cursor_page<T: serde::de::DeserializeOwned>(
        &self,
        base_path: &str,
        cursor: Option<String>,
    ) -> source::Result<TokenPage<T>> {
        let mut path = format!("{base_path}?limit={}", self.page_size);
        if let Some(cursor) = cursor.as_deref() {
            path.push_str(&format!("&cursor={cursor}"));
        }

        let page: CursorPage<T> = with_retry(|| self.get(&path), base_path).await?;
        Ok(TokenPage {
            items: page.results,
            next_token: page.next_cursor,
            is_last: page.last,
        })
    }
}

#[async_trait]
impl WorkspaceApi for WorkspaceClient {
    async fn get_workspace(&self, key: &str) -> source::Result<WorkspaceRecord> {
        self.pacer.wait().await;
        let path = format!("/spaces/{key}");
        let space: WorkspaceSpace =
            with_retry(|| self.get(&path), "get workspace").await?;
        Ok(convert::to_workspace_record(&space))
    }

    async fn list_pages(&self, workspace_id: &str) -> source::Result<Vec<PageRecord>> {
        let path = format!("/spaces/{workspace_id}/pages");
        let pages: Vec<WorkspacePage> =
            source::fetch_token_pages(&self.pacer, |cursor| self.get_cursor_page(&path, cursor))
                .await?;
        Ok(pages
            .iter()
            .map(|p| convert::to_page_record(p, workspace_id))
            .collect())
    }

    async fn list_users(&self, workspace_id: &str) -> source::Result<Vec<WorkspaceUserRecord>> {
        let path = format!("/spaces/{workspace_id}/users");
        let members: Vec<WorkspaceMember> =
            source::fetch_token_pages(&self.pacer, |cursor| self.get_cursor_page(&path, cursor))
                .await?;
        Ok(members
            .iter()
            .map(|m| convert::to_workspace_user_record(m, workspace_id))
            .collect())
    }
}
