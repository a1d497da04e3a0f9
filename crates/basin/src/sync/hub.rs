//! Per-subscriber progress channels.
//!
//! The hub owns the map of live push-connections, keyed by subscriber id.
//! Invariant: at most one live channel per subscriber at any instant.
//!
//! Every read-modify-write against a subscriber's connection (install, send,
//! teardown) runs under that subscriber's slot mutex, which is obtained
//! atomically with the map entry itself - there is no window where two
//! callers can hold distinct locks for the same id. The map lock is only
//! ever held briefly for slot lookup/creation/removal and is always acquired
//! before a slot lock, never after.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use super::progress::ProgressEvent;
use super::types::DEFAULT_CHANNEL_TIMEOUT_SECS;

/// Buffered events per subscriber channel before `publish` applies
/// backpressure.
const CHANNEL_CAPACITY: usize = 256;

/// Hub configuration.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// How long an idle connection may live before the watchdog closes it.
    pub idle_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_CHANNEL_TIMEOUT_SECS),
        }
    }
}

/// A live push-connection for one subscriber.
struct Connection {
    id: Uuid,
    tx: mpsc::Sender<ProgressEvent>,
}

/// Per-subscriber slot; the mutex is the subscriber's exclusive section.
#[derive(Default)]
struct SubscriberSlot {
    conn: Mutex<Option<Connection>>,
}

struct HubInner {
    config: HubConfig,
    slots: Mutex<HashMap<String, Arc<SubscriberSlot>>>,
}

/// The progress notification channel registry.
#[derive(Clone)]
pub struct ProgressHub {
    inner: Arc<HubInner>,
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl ProgressHub {
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                config,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Open a push channel for `subscriber_id`.
    ///
    /// If the subscriber already has a live channel, the stale one is torn
    /// down (its receiver observes end-of-stream) before the new one is
    /// installed. The returned receiver's first event is always `CONNECT`,
    /// delivered before this method returns.
    pub async fn subscribe(&self, subscriber_id: &str) -> mpsc::Receiver<ProgressEvent> {
        let slot = self.slot_for(subscriber_id).await;
        let mut conn = slot.conn.lock().await;

        if let Some(stale) = conn.take() {
            // Best-effort teardown: dropping the sender closes the old
            // receiver's stream.
            drop(stale);
            tracing::debug!(subscriber = subscriber_id, "replaced stale progress channel");
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let connection = Connection {
            id: Uuid::new_v4(),
            tx,
        };

        // The connection-confirmation frame goes out synchronously, inside
        // the exclusive section, so it is always the first event on the wire.
        if connection
            .tx
            .try_send(ProgressEvent::connect(subscriber_id))
            .is_err()
        {
            tracing::warn!(subscriber = subscriber_id, "connect event dropped");
        }

        self.spawn_watchdog(subscriber_id.to_string(), connection.id);
        *conn = Some(connection);

        rx
    }

    /// Deliver `event` to the subscriber's live channel.
    ///
    /// A subscriber with no live channel is a logged no-op - the operator may
    /// have already disconnected. Delivery of a terminal event, a send
    /// failure, and a watchdog timeout all tear the channel down.
    pub async fn publish(&self, subscriber_id: &str, event: ProgressEvent) {
        let slot = {
            let slots = self.inner.slots.lock().await;
            slots.get(subscriber_id).cloned()
        };
        let Some(slot) = slot else {
            tracing::debug!(subscriber = subscriber_id, "no live channel, dropping event");
            return;
        };

        let mut conn = slot.conn.lock().await;
        let Some(current) = conn.as_ref() else {
            tracing::debug!(subscriber = subscriber_id, "no live channel, dropping event");
            return;
        };

        let terminal = event.kind.is_terminal();
        let delivered = current.tx.send(event).await.is_ok();

        if terminal || !delivered {
            if !delivered {
                // Send errors are never retried; the subscriber must
                // reconnect.
                tracing::warn!(subscriber = subscriber_id, "progress delivery failed, closing channel");
            }
            conn.take();
            drop(conn);
            self.remove_idle_slot(subscriber_id).await;
        }
    }

    /// Whether the subscriber currently has a live channel.
    pub async fn is_live(&self, subscriber_id: &str) -> bool {
        let slot = {
            let slots = self.inner.slots.lock().await;
            slots.get(subscriber_id).cloned()
        };
        match slot {
            Some(slot) => slot.conn.lock().await.is_some(),
            None => false,
        }
    }

    /// Get or create the slot for a subscriber, atomically with the map
    /// entry.
    async fn slot_for(&self, subscriber_id: &str) -> Arc<SubscriberSlot> {
        let mut slots = self.inner.slots.lock().await;
        slots
            .entry(subscriber_id.to_string())
            .or_default()
            .clone()
    }

    /// Remove the subscriber's slot if no connection remains in it.
    async fn remove_idle_slot(&self, subscriber_id: &str) {
        let mut slots = self.inner.slots.lock().await;
        if let Some(slot) = slots.get(subscriber_id).cloned() {
            let conn = slot.conn.lock().await;
            if conn.is_none() {
                drop(conn);
                slots.remove(subscriber_id);
            }
        }
    }

    /// Close the connection identified by `conn_id` if it is still the
    /// subscriber's current one. Used by the idle watchdog; a connection
    /// replaced or closed in the meantime is left alone.
    async fn close_if_current(&self, subscriber_id: &str, conn_id: Uuid) {
        let slot = {
            let slots = self.inner.slots.lock().await;
            slots.get(subscriber_id).cloned()
        };
        let Some(slot) = slot else { return };

        let mut conn = slot.conn.lock().await;
        if conn.as_ref().is_some_and(|c| c.id == conn_id) {
            conn.take();
            drop(conn);
            tracing::debug!(subscriber = subscriber_id, "progress channel timed out");
            self.remove_idle_slot(subscriber_id).await;
        }
    }

    fn spawn_watchdog(&self, subscriber_id: String, conn_id: Uuid) {
        let hub = self.clone();
        let timeout = self.inner.config.idle_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            hub.close_if_current(&subscriber_id, conn_id).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::progress::ProgressKind;
    use crate::sync::step::SyncStep;
    use crate::sync::types::SyncCount;

    fn hub() -> ProgressHub {
        ProgressHub::default()
    }

    #[tokio::test]
    async fn subscribe_delivers_connect_first() {
        let hub = hub();
        let mut rx = hub.subscribe("op-1").await;

        let first = rx.recv().await.expect("connect event");
        assert_eq!(first.kind, ProgressKind::Connect);
        assert_eq!(first.subscriber_id, "op-1");
    }

    #[tokio::test]
    async fn publish_without_subscriber_is_a_no_op() {
        let hub = hub();
        // Must not panic or error.
        hub.publish("ghost", ProgressEvent::connect("ghost")).await;
        assert!(!hub.is_live("ghost").await);
    }

    #[tokio::test]
    async fn second_subscribe_replaces_the_first_channel() {
        let hub = hub();
        let mut first = hub.subscribe("op-1").await;
        let mut second = hub.subscribe("op-1").await;

        // First receiver: CONNECT, then end-of-stream (teardown signal).
        assert_eq!(first.recv().await.unwrap().kind, ProgressKind::Connect);
        assert!(first.recv().await.is_none(), "stale channel should close");

        // Exactly one live channel remains, and it receives events.
        assert!(hub.is_live("op-1").await);
        hub.publish(
            "op-1",
            ProgressEvent::in_progress("op-1", SyncStep::Metadata, None, "starting"),
        )
        .await;

        assert_eq!(second.recv().await.unwrap().kind, ProgressKind::Connect);
        let event = second.recv().await.unwrap();
        assert_eq!(event.kind, ProgressKind::InProgress);
        assert_eq!(event.step, Some(SyncStep::Metadata));
    }

    #[tokio::test]
    async fn terminal_event_closes_the_channel_after_delivery() {
        let hub = hub();
        let mut rx = hub.subscribe("op-1").await;

        hub.publish("op-1", ProgressEvent::completed("op-1", "done in 3s"))
            .await;

        assert_eq!(rx.recv().await.unwrap().kind, ProgressKind::Connect);
        let terminal = rx.recv().await.unwrap();
        assert_eq!(terminal.kind, ProgressKind::Completed);
        assert!(rx.recv().await.is_none(), "channel closes after terminal event");
        assert!(!hub.is_live("op-1").await);
    }

    #[tokio::test]
    async fn dropped_receiver_tears_down_on_next_publish() {
        let hub = hub();
        let rx = hub.subscribe("op-1").await;
        drop(rx);

        hub.publish(
            "op-1",
            ProgressEvent::in_progress("op-1", SyncStep::Commits, None, "x"),
        )
        .await;

        assert!(!hub.is_live("op-1").await);
    }

    #[tokio::test]
    async fn events_are_delivered_in_publish_order() {
        let hub = hub();
        let mut rx = hub.subscribe("op-1").await;

        for page in 1..=5u32 {
            hub.publish(
                "op-1",
                ProgressEvent::in_progress(
                    "op-1",
                    SyncStep::Commits,
                    Some(SyncCount::new(page as usize, page as usize)),
                    format!("page {page}"),
                ),
            )
            .await;
        }
        hub.publish("op-1", ProgressEvent::completed("op-1", "done"))
            .await;

        assert_eq!(rx.recv().await.unwrap().kind, ProgressKind::Connect);
        for page in 1..=5u32 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.kind, ProgressKind::InProgress);
            assert_eq!(event.message, format!("page {page}"));
        }
        assert_eq!(rx.recv().await.unwrap().kind, ProgressKind::Completed);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_closes_idle_channels() {
        let hub = ProgressHub::new(HubConfig {
            idle_timeout: Duration::from_secs(30),
        });
        let mut rx = hub.subscribe("op-1").await;
        assert_eq!(rx.recv().await.unwrap().kind, ProgressKind::Connect);

        tokio::time::advance(Duration::from_secs(31)).await;
        tokio::task::yield_now().await;

        assert!(rx.recv().await.is_none(), "idle channel should time out");
        assert!(!hub.is_live("op-1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_ignores_replaced_connections() {
        let hub = ProgressHub::new(HubConfig {
            idle_timeout: Duration::from_secs(30),
        });
        let _first = hub.subscribe("op-1").await;

        tokio::time::advance(Duration::from_secs(20)).await;
        let mut second = hub.subscribe("op-1").await;

        // The first connection's watchdog fires here, but it must not close
        // the replacement.
        tokio::time::advance(Duration::from_secs(15)).await;
        tokio::task::yield_now().await;

        assert!(hub.is_live("op-1").await);
        assert_eq!(second.recv().await.unwrap().kind, ProgressKind::Connect);
    }
}
