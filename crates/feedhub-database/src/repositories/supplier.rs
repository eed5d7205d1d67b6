//! Supplier repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_core::types::pagination::{PageRequest, PageResponse};
use feedhub_entity::supplier::{CreateSupplier, Supplier, UpdateSupplier};

/// Repository for supplier CRUD and sync bookkeeping.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    /// Create a new supplier repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a supplier.
    pub async fn create(&self, data: &CreateSupplier) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers \
             (workspace_id, name, source_type, endpoint_url, feed_type, credentials, unique_key, schedule) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.workspace_id)
        .bind(&data.name)
        .bind(data.source_type)
        .bind(&data.endpoint_url)
        .bind(data.feed_type)
        .bind(Json(&data.credentials))
        .bind(&data.unique_key)
        .bind(data.schedule)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create supplier", e))
    }

    /// Find a supplier within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find supplier", e))
    }

    /// Find a supplier by ID in any workspace. Operator tooling only.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find supplier", e))
    }

    /// List a workspace's suppliers with pagination.
    pub async fn list(
        &self,
        workspace_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<(Vec<Supplier>, PageResponse)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers WHERE workspace_id = $1")
            .bind(workspace_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count suppliers", e))?;

        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE workspace_id = $1 \
             ORDER BY name ASC, created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(workspace_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list suppliers", e))?;

        Ok((suppliers, PageResponse::new(page, total as u64)))
    }

    /// All suppliers of a workspace that are not paused.
    pub async fn list_syncable(&self, workspace_id: Uuid) -> AppResult<Vec<Supplier>> {
        sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE workspace_id = $1 AND status <> 'paused' ORDER BY name ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list suppliers", e))
    }

    /// Scheduled, unpaused suppliers across all workspaces without a run
    /// in flight. Due-ness is decided by the caller.
    pub async fn list_schedule_candidates(&self) -> AppResult<Vec<Supplier>> {
        sqlx::query_as::<_, Supplier>(
            "SELECT s.* FROM suppliers s \
             WHERE s.schedule <> 'manual' AND s.status <> 'paused' \
             AND NOT EXISTS ( \
                SELECT 1 FROM feed_ingestions i \
                WHERE i.supplier_id = s.id AND i.status IN ('pending', 'running') \
             ) \
             ORDER BY COALESCE(s.last_attempted_at, s.last_synced_at) ASC NULLS FIRST",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list scheduled suppliers", e)
        })
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        data: &UpdateSupplier,
    ) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, Supplier>(
            "UPDATE suppliers SET \
             name = COALESCE($3, name), \
             endpoint_url = COALESCE($4, endpoint_url), \
             feed_type = CASE WHEN $5 THEN $6 ELSE feed_type END, \
             credentials = COALESCE($7, credentials), \
             unique_key = COALESCE($8, unique_key), \
             schedule = COALESCE($9, schedule), \
             status = COALESCE($10, status), \
             updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(&data.name)
        .bind(&data.endpoint_url)
        .bind(data.feed_type.is_some())
        .bind(data.feed_type.flatten())
        .bind(data.credentials.as_ref().map(Json))
        .bind(&data.unique_key)
        .bind(data.schedule)
        .bind(data.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update supplier", e))
    }

    /// Record the storage path of a fresh upload.
    pub async fn set_storage_path(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        storage_path: &str,
    ) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, Supplier>(
            "UPDATE suppliers SET storage_path = $3, updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(storage_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store upload path", e))
    }

    /// Mark a successful sync. Paused suppliers stay paused.
    pub async fn mark_synced(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE suppliers SET \
             status = CASE WHEN status = 'paused' THEN status ELSE 'active' END, \
             last_error = NULL, last_synced_at = NOW(), last_attempted_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark supplier synced", e))?;
        Ok(())
    }

    /// Mark a failed sync. Paused suppliers stay paused.
    ///
    /// The attempt time is recorded so the schedule waits a full interval
    /// before the next try.
    pub async fn mark_error(&self, id: Uuid, message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE suppliers SET \
             status = CASE WHEN status = 'paused' THEN status ELSE 'error' END, \
             last_error = $2, last_attempted_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark supplier error", e))?;
        Ok(())
    }

    /// Delete a supplier and, by cascade, its mappings, runs and products.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete supplier", e))?;
        Ok(result.rows_affected() > 0)
    }
}
