use anyhow::Result;
use tokio::signal;

/// Resolve on Ctrl+C or SIGTERM.
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("Received Ctrl+C, shutting down");
        }
        result = sigterm() => {
            result?;
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn sigterm() -> Result<()> {
    let mut handler = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    handler.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn sigterm() -> Result<()> {
    std::future::pending::<Result<()>>().await
}
