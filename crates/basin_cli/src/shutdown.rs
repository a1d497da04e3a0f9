//! Graceful shutdown for long-running commands.

/// Resolve when the operator asks the process to stop.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
        // Without a handler the server would be unkillable by signal; park
        // forever and let the operator kill the process instead.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
