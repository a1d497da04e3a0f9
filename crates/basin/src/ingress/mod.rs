//! Webhook ingress.
//!
//! Inbound events bypass the sync coordinator entirely: the payload already
//! carries the new or changed record, so after signature validation the
//! handler applies a narrow upsert-or-patch through the store and publishes
//! one normalized message per logical change to the outbound queue.
//!
//! Incremental updates require a prior full sync baseline; an event for a
//! repository basin has never synced is rejected rather than triggering an
//! implicit sync.

mod payloads;
mod router;
mod signature;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::forge::convert;
use crate::queue::{ChangeAction, ChangeMessage, ChangeQueue};
use crate::source::CommitRecord;
use crate::store;
use crate::sync::EntityKind;

pub use payloads::{IssuesEvent, PullRequestEvent, PushCommit, PushEvent, RepositoryRef};
pub use router::{IngressState, router};
pub use signature::{SIGNATURE_PREFIX, sign, verify_signature};

/// Outcome of one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngressOutcome {
    /// The event was applied; `changes` records were created or patched.
    Processed { changes: usize },
    /// The event is valid but intentionally not applied.
    Ignored { reason: String },
    /// The event must not be applied (bad signature, unknown parent).
    Rejected { reason: String },
    /// Something unexpected failed; the sender should redeliver.
    Deferred { reason: String },
}

impl IngressOutcome {
    fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored {
            reason: reason.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    fn deferred(reason: impl Into<String>) -> Self {
        Self::Deferred {
            reason: reason.into(),
        }
    }
}

/// Validates and applies inbound webhook events.
#[derive(Clone)]
pub struct WebhookIngress {
    db: Arc<DatabaseConnection>,
    queue: Arc<dyn ChangeQueue>,
    secret: Vec<u8>,
    /// Only pushes to this branch are applied; others are ignored.
    target_branch: String,
}

impl WebhookIngress {
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        queue: Arc<dyn ChangeQueue>,
        secret: impl Into<Vec<u8>>,
        target_branch: impl Into<String>,
    ) -> Self {
        Self {
            db,
            queue,
            secret: secret.into(),
            target_branch: target_branch.into(),
        }
    }

    /// Validate and apply one delivery.
    ///
    /// The signature check runs before anything else; on mismatch no parsing
    /// and no persistence happens.
    pub async fn accept(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
        event_type_header: Option<&str>,
    ) -> IngressOutcome {
        let Some(signature) = signature_header else {
            return IngressOutcome::rejected("missing signature header");
        };
        if !signature::verify_signature(&self.secret, raw_body, signature) {
            return IngressOutcome::rejected("signature mismatch");
        }

        let Some(event_type) = event_type_header else {
            return IngressOutcome::ignored("missing event type header");
        };

        let outcome = match event_type {
            "push" => self.handle_push(raw_body).await,
            "pull_request" => self.handle_pull_request(raw_body).await,
            "issues" => self.handle_issues(raw_body).await,
            other => Ok(IngressOutcome::ignored(format!(
                "unsupported event type: {other}"
            ))),
        };

        match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(event_type, error = %e, "webhook processing failed, deferring");
                IngressOutcome::deferred(e)
            }
        }
    }

    async fn handle_push(&self, raw_body: &[u8]) -> Result<IngressOutcome, String> {
        let event: PushEvent = serde_json::from_slice(raw_body).map_err(|e| e.to_string())?;

        let Some(branch) = event.branch() else {
            return Ok(IngressOutcome::ignored("push is not a branch push"));
        };
        if branch != self.target_branch {
            return Ok(IngressOutcome::ignored(format!(
                "push to {branch} ignored, tracking {}",
                self.target_branch
            )));
        }

        let Some(repo) = self.resolve_repository(&event.repository).await? else {
            return Ok(IngressOutcome::rejected(format!(
                "repository {}/{} not yet fully synced",
                event.repository.owner.login, event.repository.name
            )));
        };

        let records: Vec<CommitRecord> = event
            .commits
            .iter()
            .map(|c| CommitRecord {
                sha: c.id.clone(),
                repository_id: repo.id,
                author_name: c.author.as_ref().and_then(|a| a.name.clone()),
                author_email: c.author.as_ref().and_then(|a| a.email.clone()),
                message: c.message.clone(),
                committed_at: c.timestamp,
                additions: None,
                deletions: None,
            })
            .collect();

        let batch = records
            .iter()
            .map(|r| (r.sha.clone(), r.active_model()))
            .collect::<Vec<_>>();
        let count = store::upsert_batch::<crate::entity::commit::Entity, _>(&self.db, batch)
            .await
            .map_err(|e| e.to_string())?;

        store::forge::record_push(&self.db, repo.id, None)
            .await
            .map_err(|e| e.to_string())?;

        for record in &records {
            self.publish_change(
                EntityKind::Commit,
                ChangeAction::Created,
                record.sha.clone(),
                serde_json::json!({
                    "sha": record.sha,
                    "repository_id": record.repository_id,
                    "message": record.message,
                }),
            )
            .await;
        }

        Ok(IngressOutcome::Processed {
            changes: count.saved,
        })
    }

    async fn handle_pull_request(&self, raw_body: &[u8]) -> Result<IngressOutcome, String> {
        let event: PullRequestEvent =
            serde_json::from_slice(raw_body).map_err(|e| e.to_string())?;

        let Some(repo) = self.resolve_repository(&event.repository).await? else {
            return Ok(IngressOutcome::rejected(format!(
                "repository {}/{} not yet fully synced",
                event.repository.owner.login, event.repository.name
            )));
        };

        let record = convert::to_pull_request_record(&event.pull_request, repo.id);
        let created = store::forge::patch_pull_request(&self.db, &record)
            .await
            .map_err(|e| e.to_string())?;

        let action = if created {
            ChangeAction::Created
        } else {
            ChangeAction::Updated
        };
        self.publish_change(
            EntityKind::PullRequest,
            action,
            record.id.to_string(),
            serde_json::json!({
                "id": record.id,
                "repository_id": record.repository_id,
                "number": record.number,
                "title": record.title,
                "state": record.state,
                "action": event.action,
            }),
        )
        .await;

        Ok(IngressOutcome::Processed { changes: 1 })
    }

    async fn handle_issues(&self, raw_body: &[u8]) -> Result<IngressOutcome, String> {
        let event: IssuesEvent = serde_json::from_slice(raw_body).map_err(|e| e.to_string())?;

        let Some(repo) = self.resolve_repository(&event.repository).await? else {
            return Ok(IngressOutcome::rejected(format!(
                "repository {}/{} not yet fully synced",
                event.repository.owner.login, event.repository.name
            )));
        };

        let record = convert::to_issue_record(&event.issue, repo.id);
        let created = store::forge::patch_issue(&self.db, &record)
            .await
            .map_err(|e| e.to_string())?;

        let action = if created {
            ChangeAction::Created
        } else {
            ChangeAction::Updated
        };
        self.publish_change(
            EntityKind::Issue,
            action,
            record.id.to_string(),
            serde_json::json!({
                "id": record.id,
                "repository_id": record.repository_id,
                "title": record.title,
                "state": record.state,
                "action": event.action,
            }),
        )
        .await;

        Ok(IngressOutcome::Processed { changes: 1 })
    }

    async fn resolve_repository(
        &self,
        reference: &RepositoryRef,
    ) -> Result<Option<crate::entity::repository::Model>, String> {
        store::forge::find_repository_by_name(&self.db, &reference.owner.login, &reference.name)
            .await
            .map_err(|e| e.to_string())
    }

    async fn publish_change(
        &self,
        kind: EntityKind,
        action: ChangeAction,
        key: String,
        payload: serde_json::Value,
    ) {
        let message = ChangeMessage {
            kind,
            action,
            key,
            payload,
        };
        if let Err(e) = self.queue.publish(message).await {
            // At-least-once toward the broker; a publish failure is logged
            // and the store update stands.
            tracing::warn!(error = %e, "change message publish failed");
        }
    }
}
