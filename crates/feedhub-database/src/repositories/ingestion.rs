//! Feed ingestion repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_core::types::pagination::{PageRequest, PageResponse};
use feedhub_entity::FeedFormat;
use feedhub_entity::ingestion::{FeedIngestion, IngestionCompletion};

use super::violates;

/// Name of the partial unique index allowing one unfinished run per supplier.
const ACTIVE_RUN_INDEX: &str = "feed_ingestions_active_supplier_key";

/// Elapsed milliseconds since the run started (or was created).
const DURATION_SQL: &str =
    "(EXTRACT(EPOCH FROM (NOW() - COALESCE(started_at, created_at))) * 1000)::BIGINT";

/// Repository for ingestion runs.
#[derive(Debug, Clone)]
pub struct IngestionRepository {
    pool: PgPool,
}

impl IngestionRepository {
    /// Create a new ingestion repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fail unfinished runs of a supplier created before `older_than`.
    pub async fn fail_stale(&self, supplier_id: Uuid, older_than: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(&format!(
            "UPDATE feed_ingestions SET status = 'failed', \
             error_message = 'Abandoned: run did not finish in time', \
             finished_at = NOW(), duration_ms = {DURATION_SQL} \
             WHERE supplier_id = $1 AND status IN ('pending', 'running') AND created_at < $2"
        ))
        .bind(supplier_id)
        .bind(older_than)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to expire stale runs", e))?;
        Ok(result.rows_affected())
    }

    /// Insert a pending run.
    ///
    /// Fails with a conflict when the supplier already has an unfinished run.
    pub async fn create_pending(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        triggered_by: Option<Uuid>,
    ) -> AppResult<FeedIngestion> {
        sqlx::query_as::<_, FeedIngestion>(
            "INSERT INTO feed_ingestions (workspace_id, supplier_id, triggered_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(triggered_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if violates(&e, ACTIVE_RUN_INDEX) {
                AppError::conflict("A sync is already in progress for this supplier")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create ingestion", e)
            }
        })
    }

    /// Move a pending run to running.
    pub async fn mark_running(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE feed_ingestions SET status = 'running', started_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to start ingestion", e))?;
        Ok(())
    }

    /// Finalize a run as completed. Finalized runs are never modified.
    pub async fn complete(
        &self,
        id: Uuid,
        completion: &IngestionCompletion,
    ) -> AppResult<Option<FeedIngestion>> {
        sqlx::query_as::<_, FeedIngestion>(&format!(
            "UPDATE feed_ingestions SET status = 'completed', feed_type = $2, \
             items_total = $3, items_ok = $4, items_error = $5, error_samples = $6, \
             finished_at = NOW(), duration_ms = {DURATION_SQL} \
             WHERE id = $1 AND status IN ('pending', 'running') RETURNING *"
        ))
        .bind(id)
        .bind(completion.feed_type)
        .bind(completion.items_total)
        .bind(completion.items_ok)
        .bind(completion.items_error)
        .bind(Json(&completion.error_samples))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete ingestion", e))
    }

    /// Finalize a run as failed.
    pub async fn fail(
        &self,
        id: Uuid,
        feed_type: Option<FeedFormat>,
        message: &str,
    ) -> AppResult<Option<FeedIngestion>> {
        sqlx::query_as::<_, FeedIngestion>(&format!(
            "UPDATE feed_ingestions SET status = 'failed', \
             feed_type = COALESCE($2, feed_type), error_message = $3, \
             finished_at = NOW(), duration_ms = {DURATION_SQL} \
             WHERE id = $1 AND status IN ('pending', 'running') RETURNING *"
        ))
        .bind(id)
        .bind(feed_type)
        .bind(message)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fail ingestion", e))
    }

    /// Find a run within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<FeedIngestion>> {
        sqlx::query_as::<_, FeedIngestion>(
            "SELECT * FROM feed_ingestions WHERE workspace_id = $1 AND id = $2",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ingestion", e))
    }

    /// List a supplier's runs, newest first.
    pub async fn list_for_supplier(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<(Vec<FeedIngestion>, PageResponse)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM feed_ingestions WHERE workspace_id = $1 AND supplier_id = $2",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count ingestions", e))?;

        let runs = sqlx::query_as::<_, FeedIngestion>(
            "SELECT * FROM feed_ingestions WHERE workspace_id = $1 AND supplier_id = $2 \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list ingestions", e))?;

        Ok((runs, PageResponse::new(page, total as u64)))
    }
}
