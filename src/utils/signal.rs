use tokio::signal;

pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        return std::future::pending().await;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received. Shutting down gracefully.");
}
