//! Outbound change queue.
//!
//! The webhook ingress publishes one normalized message per logical change;
//! downstream workers (indexers, search) consume them asynchronously.
//! Delivery is at-least-once and consumers must themselves be idempotent.
//! The broker is a collaborator - this module only defines the seam and an
//! in-memory implementation used by tests and single-process deployments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::sync::EntityKind;

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Created,
    Updated,
}

/// A normalized change notification, routed by entity kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMessage {
    pub kind: EntityKind,
    pub action: ChangeAction,
    /// The entity's upstream identifier, stringified.
    pub key: String,
    pub payload: serde_json::Value,
}

impl ChangeMessage {
    /// Routing key in `kind.action` form (e.g. `pull_request.updated`).
    #[must_use]
    pub fn routing_key(&self) -> String {
        let action = match self.action {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
        };
        format!("{}.{action}", self.kind)
    }
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}

/// Seam for the outbound message broker.
#[async_trait]
pub trait ChangeQueue: Send + Sync {
    async fn publish(&self, message: ChangeMessage) -> Result<(), QueueError>;
}

/// In-memory queue over an unbounded channel.
///
/// A dropped receiver is tolerated (logged, not an error) so a process
/// without a consumer behaves like one with a broker that acks everything.
#[derive(Clone)]
pub struct InMemoryQueue {
    tx: mpsc::UnboundedSender<ChangeMessage>,
}

impl InMemoryQueue {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChangeMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ChangeQueue for InMemoryQueue {
    async fn publish(&self, message: ChangeMessage) -> Result<(), QueueError> {
        let routing_key = message.routing_key();
        if self.tx.send(message).is_err() {
            tracing::debug!(routing_key, "change queue has no consumer, dropping message");
        }
        Ok(())
    }
}
