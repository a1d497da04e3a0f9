//! Integration tests for the webhook ingress.
//!
//! Each test runs against an in-memory SQLite database with a synced
//! repository baseline, delivers signed (or deliberately unsigned) payloads,
//! and asserts on the outcome, the store, and the outbound queue.

#![cfg(feature = "migrate")]

use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use basin::connect_and_migrate;
use basin::entity::prelude::*;
use basin::entity::repository;
use basin::ingress::{IngressOutcome, WebhookIngress, sign};
use basin::queue::{ChangeMessage, ChangeQueue, InMemoryQueue};
use basin::sync::EntityKind;

const SECRET: &[u8] = b"webhook-secret";

struct Harness {
    db: Arc<DatabaseConnection>,
    ingress: WebhookIngress,
    queue_rx: tokio::sync::mpsc::UnboundedReceiver<ChangeMessage>,
}

async fn harness() -> Harness {
    let db = Arc::new(
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database should migrate"),
    );
    let (queue, queue_rx) = InMemoryQueue::new();
    let ingress = WebhookIngress::new(
        Arc::clone(&db),
        Arc::new(queue) as Arc<dyn ChangeQueue>,
        SECRET,
        "main",
    );
    Harness {
        db,
        ingress,
        queue_rx,
    }
}

/// Insert the full-sync baseline the ingress resolves parents against.
async fn insert_repository(db: &DatabaseConnection) {
    let model = repository::ActiveModel {
        id: Set(7),
        owner: Set("acme".to_string()),
        name: Set("widget".to_string()),
        description: Set(None),
        default_branch: Set("main".to_string()),
        status: Set(SyncState::Completed),
        last_synced_at: Set(None),
        created_at: Set(None),
        updated_at: Set(None),
        pushed_at: Set(None),
    };
    Repository::insert(model)
        .exec(db)
        .await
        .expect("repository insert should succeed");
}

fn push_body(branch: &str) -> Vec<u8> {
    serde_json::json!({
        "ref": format!("refs/heads/{branch}"),
        "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}},
        "commits": [
            {"id": "abc123", "message": "fix parser",
             "author": {"name": "Dev", "email": "dev@example.com"}},
            {"id": "def456", "message": "add tests",
             "author": {"name": "Dev", "email": "dev@example.com"}}
        ]
    })
    .to_string()
    .into_bytes()
}

/// A wrong digest is rejected outright and no persistence call occurs.
#[tokio::test]
async fn bad_signature_is_rejected_before_any_processing() {
    let mut h = harness().await;
    insert_repository(&h.db).await;

    let outcome = h
        .ingress
        .accept(&push_body("main"), Some("sha256=deadbeef"), Some("push"))
        .await;

    assert!(matches!(outcome, IngressOutcome::Rejected { .. }));
    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 0);
    assert!(h.queue_rx.try_recv().is_err(), "no message may be published");
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let h = harness().await;
    let outcome = h.ingress.accept(&push_body("main"), None, Some("push")).await;
    assert!(matches!(outcome, IngressOutcome::Rejected { .. }));
}

#[tokio::test]
async fn valid_push_persists_commits_and_publishes_changes() {
    let mut h = harness().await;
    insert_repository(&h.db).await;

    let body = push_body("main");
    let signature = sign(SECRET, &body);
    let outcome = h
        .ingress
        .accept(&body, Some(&signature), Some("push"))
        .await;

    assert_eq!(outcome, IngressOutcome::Processed { changes: 2 });
    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 2);

    let repo = Repository::find_by_id(7).one(&*h.db).await.unwrap().unwrap();
    assert!(repo.pushed_at.is_some(), "push event refreshes pushed_at");

    let first = h.queue_rx.try_recv().expect("first change message");
    assert_eq!(first.kind, EntityKind::Commit);
    assert_eq!(first.routing_key(), "commit.created");
    let second = h.queue_rx.try_recv().expect("second change message");
    assert_eq!(second.key, "def456");
}

/// Redelivery of the same push is harmless: the store skips every commit.
#[tokio::test]
async fn redelivered_push_saves_nothing() {
    let h = harness().await;
    insert_repository(&h.db).await;

    let body = push_body("main");
    let signature = sign(SECRET, &body);
    h.ingress.accept(&body, Some(&signature), Some("push")).await;
    let outcome = h
        .ingress
        .accept(&body, Some(&signature), Some("push"))
        .await;

    assert_eq!(outcome, IngressOutcome::Processed { changes: 0 });
    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 2);
}

#[tokio::test]
async fn push_to_another_branch_is_ignored() {
    let mut h = harness().await;
    insert_repository(&h.db).await;

    let body = push_body("feature/retry");
    let signature = sign(SECRET, &body);
    let outcome = h
        .ingress
        .accept(&body, Some(&signature), Some("push"))
        .await;

    assert!(matches!(outcome, IngressOutcome::Ignored { .. }));
    assert_eq!(Commit::find().count(&*h.db).await.unwrap(), 0);
    assert!(h.queue_rx.try_recv().is_err());
}

#[tokio::test]
async fn event_for_unsynced_repository_is_rejected() {
    let h = harness().await;
    // No repository baseline inserted.

    let body = push_body("main");
    let signature = sign(SECRET, &body);
    let outcome = h
        .ingress
        .accept(&body, Some(&signature), Some("push"))
        .await;

    match outcome {
        IngressOutcome::Rejected { reason } => {
            assert!(reason.contains("not yet fully synced"), "reason: {reason}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unsupported_event_type_is_ignored() {
    let h = harness().await;
    let body = b"{}".to_vec();
    let signature = sign(SECRET, &body);

    let outcome = h
        .ingress
        .accept(&body, Some(&signature), Some("deployment_status"))
        .await;

    assert!(matches!(outcome, IngressOutcome::Ignored { .. }));
}

#[tokio::test]
async fn pull_request_event_inserts_then_patches() {
    let mut h = harness().await;
    insert_repository(&h.db).await;

    let opened = serde_json::json!({
        "action": "opened",
        "pull_request": {"id": 500, "number": 4, "title": "add retries", "state": "open"},
        "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
    })
    .to_string()
    .into_bytes();
    let signature = sign(SECRET, &opened);
    let outcome = h
        .ingress
        .accept(&opened, Some(&signature), Some("pull_request"))
        .await;
    assert_eq!(outcome, IngressOutcome::Processed { changes: 1 });

    let created = h.queue_rx.try_recv().expect("created message");
    assert_eq!(created.routing_key(), "pull_request.created");

    let merged = serde_json::json!({
        "action": "closed",
        "pull_request": {"id": 500, "number": 4, "title": "add retries (merged)",
                          "state": "merged", "merged_at": "2026-03-01T10:00:00Z"},
        "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
    })
    .to_string()
    .into_bytes();
    let signature = sign(SECRET, &merged);
    let outcome = h
        .ingress
        .accept(&merged, Some(&signature), Some("pull_request"))
        .await;
    assert_eq!(outcome, IngressOutcome::Processed { changes: 1 });

    let updated = h.queue_rx.try_recv().expect("updated message");
    assert_eq!(updated.routing_key(), "pull_request.updated");

    assert_eq!(PullRequest::find().count(&*h.db).await.unwrap(), 1);
    let row = PullRequest::find_by_id(500)
        .one(&*h.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.state, "merged");
    assert_eq!(row.title, "add retries (merged)");
    assert!(row.merged_at.is_some());
}

#[tokio::test]
async fn issue_event_patches_metadata() {
    let h = harness().await;
    insert_repository(&h.db).await;

    let opened = serde_json::json!({
        "action": "opened",
        "issue": {"id": 600, "number": 12, "title": "crash on resume", "state": "open"},
        "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
    })
    .to_string()
    .into_bytes();
    let signature = sign(SECRET, &opened);
    h.ingress
        .accept(&opened, Some(&signature), Some("issues"))
        .await;

    let closed = serde_json::json!({
        "action": "closed",
        "issue": {"id": 600, "number": 12, "title": "crash on resume", "state": "closed",
                   "closed_at": "2026-03-02T09:00:00Z"},
        "repository": {"id": 7, "name": "widget", "owner": {"login": "acme"}}
    })
    .to_string()
    .into_bytes();
    let signature = sign(SECRET, &closed);
    let outcome = h
        .ingress
        .accept(&closed, Some(&signature), Some("issues"))
        .await;
    assert_eq!(outcome, IngressOutcome::Processed { changes: 1 });

    let row = Issue::find_by_id(600).one(&*h.db).await.unwrap().unwrap();
    assert_eq!(row.state, "closed");
    assert!(row.closed_at.is_some());
    assert_eq!(row.repository_id, Some(7));
}

#[tokio::test]
async fn malformed_payload_defers_for_redelivery() {
    let h = harness().await;
    let body = b"not json at all".to_vec();
    let signature = sign(SECRET, &body);

    let outcome = h.ingress.accept(&body, Some(&signature), Some("push")).await;

    assert!(matches!(outcome, IngressOutcome::Deferred { .. }));
}
