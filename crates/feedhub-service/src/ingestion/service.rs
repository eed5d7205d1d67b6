//! The sync pipeline: fetch, detect, parse, store raw rows, then map.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use feedhub_core::config::FeedConfig;
use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_core::types::{PageRequest, PageResponse};
use feedhub_database::repositories::{IngestionRepository, RawProductRepository, SupplierRepository};
use feedhub_entity::FeedFormat;
use feedhub_entity::ingestion::{FeedIngestion, IngestionCompletion};
use feedhub_entity::product::NewRawProduct;
use feedhub_entity::supplier::{Supplier, SupplierStatus};
use feedhub_feed::parse::{ItemError, MAX_ERROR_SAMPLES, ParseOutcome, parse_feed};

use crate::context::RequestContext;
use crate::mapping::{MappingResult, MappingService};
use crate::supplier::FeedSourceLoader;

/// Result of one successful sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// The finalized run.
    pub ingestion: FeedIngestion,
    /// Counts of the automatic mapping step, when it ran.
    pub mapping: Option<MappingResult>,
    /// Document-level problems that did not fail the run.
    pub warnings: Vec<String>,
}

/// Per-supplier line of a sync-all report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Supplier ID.
    pub supplier_id: Uuid,
    /// Supplier name.
    pub name: String,
    /// `completed` or `failed`.
    pub status: String,
    /// Run ID when one was recorded.
    pub ingestion_id: Option<Uuid>,
    /// Items stored.
    pub items_ok: i32,
    /// Failure message.
    pub error: Option<String>,
}

/// Counts gathered while storing parsed items.
struct Stored {
    ok: usize,
    errors: usize,
    samples: Vec<ItemError>,
}

/// Runs supplier syncs and exposes their history.
#[derive(Debug, Clone)]
pub struct IngestionService {
    supplier_repo: Arc<SupplierRepository>,
    ingestion_repo: Arc<IngestionRepository>,
    raw_repo: Arc<RawProductRepository>,
    loader: Arc<FeedSourceLoader>,
    mapping: Arc<MappingService>,
    config: FeedConfig,
}

impl IngestionService {
    /// Creates a new ingestion service.
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        ingestion_repo: Arc<IngestionRepository>,
        raw_repo: Arc<RawProductRepository>,
        loader: Arc<FeedSourceLoader>,
        mapping: Arc<MappingService>,
        config: FeedConfig,
    ) -> Self {
        Self {
            supplier_repo,
            ingestion_repo,
            raw_repo,
            loader,
            mapping,
            config,
        }
    }

    /// Sync one supplier of the active workspace.
    pub async fn sync(&self, ctx: &RequestContext, supplier_id: Uuid) -> AppResult<SyncOutcome> {
        ctx.require_editor()?;
        let supplier = self
            .supplier_repo
            .find(ctx.workspace_id, supplier_id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))?;
        if supplier.status == SupplierStatus::Paused {
            return Err(AppError::validation("Supplier is paused"));
        }
        self.sync_supplier(&supplier, Some(ctx.user_id)).await
    }

    /// Sync every unpaused supplier of the active workspace with bounded
    /// concurrency.
    pub async fn sync_all(&self, ctx: &RequestContext) -> AppResult<Vec<SyncSummary>> {
        ctx.require_editor()?;
        let suppliers: Vec<Supplier> = self
            .supplier_repo
            .list_syncable(ctx.workspace_id)
            .await?
            .into_iter()
            .filter(Supplier::has_source)
            .collect();
        info!(workspace_id = %ctx.workspace_id, suppliers = suppliers.len(), "Syncing all suppliers");
        Ok(self
            .sync_many(suppliers, Some(ctx.user_id), self.config.sync_concurrency)
            .await)
    }

    /// Sync a set of suppliers with at most `concurrency` in flight.
    pub async fn sync_many(
        &self,
        suppliers: Vec<Supplier>,
        triggered_by: Option<Uuid>,
        concurrency: usize,
    ) -> Vec<SyncSummary> {
        stream::iter(suppliers)
            .map(move |supplier| async move {
                let result = self.sync_supplier(&supplier, triggered_by).await;
                summarize(&supplier, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }

    /// Run the full pipeline for one supplier.
    ///
    /// Fails with a conflict while another run of the supplier is in
    /// flight. Pipeline failures finalize the run as failed, flag the
    /// supplier and are returned to the caller.
    pub async fn sync_supplier(
        &self,
        supplier: &Supplier,
        triggered_by: Option<Uuid>,
    ) -> AppResult<SyncOutcome> {
        let horizon = Utc::now() - Duration::minutes(self.config.stale_ingestion_minutes);
        let expired = self.ingestion_repo.fail_stale(supplier.id, horizon).await?;
        if expired > 0 {
            warn!(supplier_id = %supplier.id, expired, "Expired abandoned ingestion runs");
        }

        let run = self
            .ingestion_repo
            .create_pending(supplier.workspace_id, supplier.id, triggered_by)
            .await?;
        self.ingestion_repo.mark_running(run.id).await?;
        info!(
            workspace_id = %supplier.workspace_id,
            supplier_id = %supplier.id,
            ingestion_id = %run.id,
            "Ingestion started"
        );

        let mut detected: Option<FeedFormat> = None;
        match self.ingest(supplier, run.id, &mut detected).await {
            Ok((completion, warnings)) => {
                let ingestion = self
                    .ingestion_repo
                    .complete(run.id, &completion)
                    .await?
                    .ok_or_else(|| AppError::conflict("Ingestion was finalized concurrently"))?;
                self.supplier_repo.mark_synced(supplier.id).await?;
                info!(
                    supplier_id = %supplier.id,
                    ingestion_id = %run.id,
                    total = completion.items_total,
                    ok = completion.items_ok,
                    errors = completion.items_error,
                    "Ingestion completed"
                );

                let mapping = if self.config.auto_map_after_sync {
                    match self.mapping.run_for(supplier.workspace_id, supplier.id).await {
                        Ok(result) => Some(result),
                        Err(e) => {
                            error!(supplier_id = %supplier.id, error = %e, "Automatic mapping failed");
                            None
                        }
                    }
                } else {
                    None
                };

                Ok(SyncOutcome {
                    ingestion,
                    mapping,
                    warnings,
                })
            }
            Err(e) => {
                let message = if e.kind.is_internal() {
                    "Internal error during ingestion".to_string()
                } else {
                    e.message.clone()
                };
                error!(
                    supplier_id = %supplier.id,
                    ingestion_id = %run.id,
                    error = %e,
                    "Ingestion failed"
                );
                if let Err(finalize) = self.ingestion_repo.fail(run.id, detected, &message).await {
                    error!(ingestion_id = %run.id, error = %finalize, "Failed to finalize ingestion");
                }
                if let Err(flag) = self.supplier_repo.mark_error(supplier.id, &message).await {
                    error!(supplier_id = %supplier.id, error = %flag, "Failed to flag supplier");
                }
                Err(e)
            }
        }
    }

    async fn ingest(
        &self,
        supplier: &Supplier,
        ingestion_id: Uuid,
        detected: &mut Option<FeedFormat>,
    ) -> AppResult<(IngestionCompletion, Vec<String>)> {
        let feed = self.loader.load(supplier).await?;
        *detected = Some(feed.format);

        let outcome = parse_feed(feed.format, &feed.bytes, &supplier.unique_key)?;
        for warning in &outcome.warnings {
            warn!(supplier_id = %supplier.id, warning = %warning, "Feed parsed with warnings");
        }

        let stored = self.store_items(supplier, ingestion_id, &outcome).await;
        let completion = IngestionCompletion::new(
            feed.format,
            outcome.total,
            stored.ok,
            stored.errors,
            stored.samples,
        );
        Ok((completion, outcome.warnings))
    }

    /// Upsert parsed items in batches. A failed batch counts its items as
    /// errors and the run continues.
    async fn store_items(
        &self,
        supplier: &Supplier,
        ingestion_id: Uuid,
        outcome: &ParseOutcome,
    ) -> Stored {
        let mut stored = Stored {
            ok: 0,
            errors: outcome.errors,
            samples: outcome.error_samples.clone(),
        };
        let batch_size = self.config.insert_batch_size.max(1);

        for (batch_index, batch) in outcome.items.chunks(batch_size).enumerate() {
            let rows: Vec<NewRawProduct> = batch
                .iter()
                .map(|item| NewRawProduct {
                    external_id: item.external_id.clone(),
                    data: item.data.clone(),
                })
                .collect();
            match self
                .raw_repo
                .upsert_batch(supplier.workspace_id, supplier.id, ingestion_id, &rows)
                .await
            {
                Ok(_) => stored.ok += batch.len(),
                Err(e) => {
                    error!(
                        supplier_id = %supplier.id,
                        batch = batch_index,
                        items = batch.len(),
                        error = %e,
                        "Failed to store item batch"
                    );
                    stored.errors += batch.len();
                    if stored.samples.len() < MAX_ERROR_SAMPLES {
                        stored.samples.push(ItemError {
                            index: batch.first().map_or(batch_index * batch_size, |i| i.index),
                            reason: format!("batch of {} items could not be stored", batch.len()),
                        });
                    }
                }
            }
        }
        stored
    }

    /// Runs of a supplier, newest first.
    pub async fn list_for_supplier(
        &self,
        ctx: &RequestContext,
        supplier_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<(Vec<FeedIngestion>, PageResponse)> {
        self.supplier_repo
            .find(ctx.workspace_id, supplier_id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))?;
        self.ingestion_repo
            .list_for_supplier(ctx.workspace_id, supplier_id, page)
            .await
    }

    /// Get one run.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<FeedIngestion> {
        self.ingestion_repo
            .find(ctx.workspace_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingestion not found"))
    }
}

fn summarize(supplier: &Supplier, result: AppResult<SyncOutcome>) -> SyncSummary {
    match result {
        Ok(outcome) => SyncSummary {
            supplier_id: supplier.id,
            name: supplier.name.clone(),
            status: outcome.ingestion.status.as_str().to_string(),
            ingestion_id: Some(outcome.ingestion.id),
            items_ok: outcome.ingestion.items_ok,
            error: None,
        },
        Err(e) => SyncSummary {
            supplier_id: supplier.id,
            name: supplier.name.clone(),
            status: "failed".to_string(),
            ingestion_id: None,
            items_ok: 0,
            error: Some(if e.kind.is_internal() {
                "Internal error".to_string()
            } else {
                e.message
            }),
        },
    }
}
