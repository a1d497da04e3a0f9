//! Progress events pushed to subscribed operators during sync runs.

use serde::{Deserialize, Serialize};

use super::step::SyncStep;
use super::types::SyncCount;

/// Kind of a progress event.
///
/// Exactly one `Connect` opens a channel; a run's event stream is a
/// (possibly empty) sequence of `InProgress` terminated by exactly one
/// `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressKind {
    Connect,
    InProgress,
    Completed,
    Failed,
}

impl ProgressKind {
    /// The event name on the wire.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            ProgressKind::Connect => "CONNECT",
            ProgressKind::InProgress => "IN_PROGRESS",
            ProgressKind::Completed => "COMPLETED",
            ProgressKind::Failed => "FAILED",
        }
    }

    /// Terminal events close the subscriber's channel after delivery.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressKind::Completed | ProgressKind::Failed)
    }
}

/// One progress notification for a single subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub subscriber_id: String,
    pub kind: ProgressKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<SyncStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<SyncCount>,
    pub message: String,
}

impl ProgressEvent {
    /// The connection-confirmation event delivered synchronously inside
    /// `subscribe`.
    #[must_use]
    pub fn connect(subscriber_id: &str) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            kind: ProgressKind::Connect,
            step: None,
            counts: None,
            message: "connected".to_string(),
        }
    }

    #[must_use]
    pub fn in_progress(
        subscriber_id: &str,
        step: SyncStep,
        counts: Option<SyncCount>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            kind: ProgressKind::InProgress,
            step: Some(step),
            counts,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn completed(subscriber_id: &str, message: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            kind: ProgressKind::Completed,
            step: Some(SyncStep::Completed),
            counts: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(subscriber_id: &str, step: SyncStep, message: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.to_string(),
            kind: ProgressKind::Failed,
            step: Some(step),
            counts: None,
            message: message.into(),
        }
    }
}
