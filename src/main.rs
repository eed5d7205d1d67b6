//! Supplier Feed Hub server.
//!
//! Main entry point that loads configuration, prepares the database and
//! storage, then hands over to the HTTP server and sync scheduler.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_database::DatabasePool;
use feedhub_storage::LocalStorageProvider;

#[tokio::main]
async fn main() {
    let env = std::env::var("FEEDHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Supplier Feed Hub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;

    feedhub_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Feed file storage ────────────────────────────────
    let storage = LocalStorageProvider::new(&config.storage.root_path).await?;
    tracing::info!(root = %config.storage.root_path, "Storage initialized");

    // ── Step 3: HTTP server and scheduler ────────────────────────
    feedhub_api::run_server(config, db, Arc::new(storage)).await
}
