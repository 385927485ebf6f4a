//! Server startup and graceful shutdown.

use crate::config::ServerConfig;
use crate::rate_limit::ClientRateLimiter;
use crate::routes::{router, AppState};
use confess_core::{CoreConfig, SubmissionService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// How often idle rate limit buckets are dropped.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the REST API until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if:
/// - the rate limiter cannot be built from the configured quota,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
pub async fn serve(server_cfg: ServerConfig, core_cfg: CoreConfig) -> anyhow::Result<()> {
    if !server_cfg.public_dir.is_dir() {
        tracing::warn!(
            "Public directory does not exist, mini-app assets will 404: {}",
            server_cfg.public_dir.display()
        );
    }

    let limiter = Arc::new(ClientRateLimiter::new(&server_cfg.rate_limit)?);
    let pruner = limiter.spawn_pruner(PRUNE_INTERVAL);

    let state = AppState {
        submissions: SubmissionService::new(&core_cfg),
    };
    let app = router(state, limiter, &server_cfg.public_dir);

    let listener = TcpListener::bind(&server_cfg.addr).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pruner.abort();
    tracing::info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
