//! OS signal handling for command-line hosts.

/// Wait for Ctrl+C.
///
/// If the handler cannot be installed the future never resolves, so the
/// host simply runs to completion.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
