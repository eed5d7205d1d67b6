//! Application builder: wires state, the scheduled sync worker and the
//! HTTP server together.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_core::traits::storage::StorageProvider;
use feedhub_database::DatabasePool;
use feedhub_worker::{CronScheduler, ScheduledSyncJob};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the FeedHub server until Ctrl+C or SIGTERM.
pub async fn run_server(
    config: AppConfig,
    db: DatabasePool,
    storage: Arc<dyn StorageProvider>,
) -> Result<(), AppError> {
    tracing::info!("Starting FeedHub server...");

    let state = AppState::build(config.clone(), db.clone(), storage)?;

    // ── Scheduled sync ───────────────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let job = Arc::new(ScheduledSyncJob::new(
            Arc::clone(&state.supplier_repo),
            Arc::clone(&state.ingestion_service),
            config.worker.concurrency,
        ));
        let scheduler = CronScheduler::new(job, config.worker.clone()).await?;
        scheduler.register_sync_sweep().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled sync disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "FeedHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Scheduler shutdown failed"),
            Err(_) => tracing::warn!("Scheduler did not stop within the shutdown grace period"),
        }
    }
    db.close().await;

    tracing::info!("FeedHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
