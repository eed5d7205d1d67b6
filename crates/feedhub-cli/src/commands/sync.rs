//! Operator-triggered syncs.

use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use feedhub_api::AppState;
use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_service::ingestion::SyncSummary;
use feedhub_storage::LocalStorageProvider;
use feedhub_worker::ScheduledSyncJob;

/// Arguments for the sync command
#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["supplier", "due"])))]
pub struct SyncArgs {
    /// Sync a single supplier, ignoring its schedule
    #[arg(long)]
    pub supplier: Option<Uuid>,
    /// Run one scheduler sweep over all due suppliers
    #[arg(long)]
    pub due: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct SyncRow {
    #[tabled(rename = "Supplier")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Items")]
    items_ok: i32,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<SyncSummary> for SyncRow {
    fn from(s: SyncSummary) -> Self {
        Self {
            name: s.name,
            status: s.status,
            items_ok: s.items_ok,
            error: output::truncate(s.error.as_deref().unwrap_or("-"), 60),
        }
    }
}

/// Execute a sync
pub async fn execute(args: &SyncArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let db = super::create_db_pool(config).await?;
    let storage = LocalStorageProvider::new(&config.storage.root_path).await?;
    let state = AppState::build(config.clone(), db.clone(), Arc::new(storage))?;

    let summaries = if let Some(id) = args.supplier {
        tracing::debug!(supplier_id = %id, "Syncing single supplier");
        let supplier = state
            .supplier_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Supplier {id} not found")))?;
        state
            .ingestion_service
            .sync_many(vec![supplier], None, 1)
            .await
    } else {
        tracing::debug!("Running one scheduled sync sweep");
        ScheduledSyncJob::new(
            state.supplier_repo.clone(),
            state.ingestion_service.clone(),
            config.worker.concurrency,
        )
        .run()
        .await?
    };
    db.close().await;

    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    let rows: Vec<SyncRow> = summaries.into_iter().map(SyncRow::from).collect();
    output::print_list(&rows, format);

    if failed > 0 {
        output::print_warning(&format!("{failed} of {} syncs failed", rows.len()));
    } else if format == OutputFormat::Table && !rows.is_empty() {
        output::print_success(&format!("{} suppliers synced", rows.len()));
    }
    Ok(())
}
