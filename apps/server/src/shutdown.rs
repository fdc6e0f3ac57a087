use anyhow::{Context, Result};
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// In-flight requests get this long to finish once a signal arrives.
const GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Spawns the listener that turns SIGINT/SIGTERM into a graceful shutdown of `handle`.
pub(crate) fn spawn_listener(handle: Handle<SocketAddr>) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!(error = %e, "Shutdown signal listener failed");
            return;
        }
        info!(grace = ?GRACE_PERIOD, "Shutdown signal received, draining connections");
        handle.graceful_shutdown(Some(GRACE_PERIOD));
    });
}

async fn wait_for_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
