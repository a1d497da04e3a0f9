//! `basin serve` - webhook ingress, SSE progress stream, sync triggers.

use std::sync::Arc;

use basin::connect_and_migrate;
use basin::ingress::{IngressState, WebhookIngress, router};
use basin::queue::{ChangeQueue, InMemoryQueue};

use crate::config::Settings;
use crate::shutdown;

use super::CliError;

pub async fn run(settings: &Settings) -> Result<(), CliError> {
    if settings.webhook_secret.is_empty() {
        return Err("webhook_secret is not configured; refusing to accept unsigned events".into());
    }

    let db = Arc::new(connect_and_migrate(&settings.database_url).await?);
    let (coordinator, _hub) = super::build_coordinator(settings, Arc::clone(&db))?;

    let (queue, mut queue_rx) = InMemoryQueue::new();
    // Drain the queue into the log until an external broker consumer exists.
    tokio::spawn(async move {
        while let Some(message) = queue_rx.recv().await {
            tracing::info!(
                routing_key = %message.routing_key(),
                key = %message.key,
                "change published"
            );
        }
    });

    let ingress = WebhookIngress::new(
        db,
        Arc::new(queue) as Arc<dyn ChangeQueue>,
        settings.webhook_secret.as_bytes().to_vec(),
        settings.target_branch.clone(),
    );

    let app = router(IngressState {
        coordinator,
        ingress: Arc::new(ingress),
    });

    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    tracing::info!(bind = %settings.bind, "basin serving webhooks and progress streams");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}
