//! HTTP surface for webhooks, the progress stream, and sync triggers.
//!
//! Deliberately thin: request handling stops at header extraction and
//! outcome-to-status mapping; everything interesting happens in
//! [`WebhookIngress`] and the sync coordinator.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use crate::sync::{SyncCoordinator, SyncStep, SyncTarget};

use super::{IngressOutcome, WebhookIngress};

/// Header carrying the event type.
pub const EVENT_TYPE_HEADER: &str = "x-event-type";

/// Header carrying the HMAC signature.
pub const SIGNATURE_HEADER: &str = "x-signature-256";

/// Shared state for the HTTP surface.
#[derive(Clone)]
pub struct IngressState {
    pub coordinator: SyncCoordinator,
    pub ingress: Arc<WebhookIngress>,
}

/// Build the router: webhook ingress, SSE progress stream, sync triggers.
pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/events/{subscriber}", get(events))
        .route("/sync/forge/{owner}/{name}", post(trigger_forge))
        .route("/sync/tracker/{key}", post(trigger_tracker))
        .route("/sync/workspace/{key}", post(trigger_workspace))
        .with_state(state)
}

async fn webhook(
    State(state): State<IngressState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let event_type = headers
        .get(EVENT_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let outcome = state
        .ingress
        .accept(&body, signature.as_deref(), event_type.as_deref())
        .await;

    match outcome {
        IngressOutcome::Processed { changes } => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "processed", "changes": changes})),
        ),
        IngressOutcome::Ignored { reason } => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "ignored", "reason": reason})),
        ),
        IngressOutcome::Rejected { reason } => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"status": "rejected", "reason": reason})),
        ),
        IngressOutcome::Deferred { reason } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"status": "deferred", "reason": reason})),
        ),
    }
}

/// Server-sent progress events for one subscriber.
///
/// The stream carries the named events of the wire contract and ends once a
/// terminal event closes the subscriber's channel.
async fn events(
    State(state): State<IngressState>,
    Path(subscriber): Path<String>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.coordinator.hub().subscribe(&subscriber).await;

    let stream = ReceiverStream::new(rx).map(|event| {
        let frame = Event::default().event(event.kind.event_name());
        Ok(frame
            .json_data(&event)
            .unwrap_or_else(|_| Event::default().comment("serialization error")))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn parse_start_from(
    params: &HashMap<String, String>,
) -> Result<Option<SyncStep>, (StatusCode, Json<serde_json::Value>)> {
    match params.get("from") {
        None => Ok(None),
        Some(name) => match SyncStep::parse(name) {
            Some(step) => Ok(Some(step)),
            None => Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("unknown step: {name}")})),
            )),
        },
    }
}

fn subscriber_for<'a>(params: &'a HashMap<String, String>, default: &'a str) -> &'a str {
    params.get("subscriber").map_or(default, String::as_str)
}

async fn trigger_forge(
    State(state): State<IngressState>,
    Path((owner, name)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let start_from = match parse_start_from(&params) {
        Ok(step) => step,
        Err(response) => return response,
    };

    let key = format!("{owner}/{name}");
    let subscriber = subscriber_for(&params, &key).to_string();
    state
        .coordinator
        .start_full_sync(&subscriber, SyncTarget::Forge { owner, name }, start_from);

    accepted(&key, &subscriber)
}

async fn trigger_tracker(
    State(state): State<IngressState>,
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let start_from = match parse_start_from(&params) {
        Ok(step) => step,
        Err(response) => return response,
    };

    let subscriber = subscriber_for(&params, &key).to_string();
    state
        .coordinator
        .start_full_sync(&subscriber, SyncTarget::Tracker { key: key.clone() }, start_from);

    accepted(&key, &subscriber)
}

async fn trigger_workspace(
    State(state): State<IngressState>,
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let start_from = match parse_start_from(&params) {
        Ok(step) => step,
        Err(response) => return response,
    };

    let subscriber = subscriber_for(&params, &key).to_string();
    state.coordinator.start_full_sync(
        &subscriber,
        SyncTarget::Workspace { key: key.clone() },
        start_from,
    );

    accepted(&key, &subscriber)
}

fn accepted(key: &str, subscriber: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "status": "started",
            "key": key,
            "subscriber": subscriber,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_start_from_accepts_known_steps() {
        let mut params = HashMap::new();
        params.insert("from".to_string(), "comments".to_string());
        assert_eq!(
            parse_start_from(&params).unwrap(),
            Some(SyncStep::Comments)
        );

        params.insert("from".to_string(), "bogus".to_string());
        assert!(parse_start_from(&params).is_err());

        assert_eq!(parse_start_from(&HashMap::new()).unwrap(), None);
    }

    #[test]
    fn subscriber_defaults_to_key() {
        let params = HashMap::new();
        assert_eq!(subscriber_for(&params, "acme/widget"), "acme/widget");

        let mut params = HashMap::new();
        params.insert("subscriber".to_string(), "op-1".to_string());
        assert_eq!(subscriber_for(&params, "acme/widget"), "op-1");
    }
}
