//! Export profile repository implementation.

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::export::{CreateExportProfile, ExportProfile, UpdateExportProfile};

/// Repository for export profiles.
#[derive(Debug, Clone)]
pub struct ExportProfileRepository {
    pool: PgPool,
}

impl ExportProfileRepository {
    /// Create a new export profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a profile.
    pub async fn create(&self, data: &CreateExportProfile) -> AppResult<ExportProfile> {
        sqlx::query_as::<_, ExportProfile>(
            "INSERT INTO export_profiles \
             (workspace_id, name, format, field_selection, field_ordering, filters, delivery_method, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(data.workspace_id)
        .bind(&data.name)
        .bind(data.format)
        .bind(&data.field_selection)
        .bind(&data.field_ordering)
        .bind(Json(&data.filters))
        .bind(data.delivery_method)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create export profile", e))
    }

    /// List a workspace's profiles by name.
    pub async fn list(&self, workspace_id: Uuid) -> AppResult<Vec<ExportProfile>> {
        sqlx::query_as::<_, ExportProfile>(
            "SELECT * FROM export_profiles WHERE workspace_id = $1 ORDER BY name ASC, created_at ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list export profiles", e))
    }

    /// Find a profile within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<ExportProfile>> {
        sqlx::query_as::<_, ExportProfile>(
            "SELECT * FROM export_profiles WHERE workspace_id = $1 AND id = $2",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find export profile", e))
    }

    /// Find a profile by id alone, for the public live feed.
    pub async fn find_public(&self, id: Uuid) -> AppResult<Option<ExportProfile>> {
        sqlx::query_as::<_, ExportProfile>("SELECT * FROM export_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find export profile", e))
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        data: &UpdateExportProfile,
    ) -> AppResult<Option<ExportProfile>> {
        sqlx::query_as::<_, ExportProfile>(
            "UPDATE export_profiles SET \
             name = COALESCE($3, name), \
             format = COALESCE($4, format), \
             field_selection = COALESCE($5, field_selection), \
             field_ordering = COALESCE($6, field_ordering), \
             filters = COALESCE($7, filters), \
             delivery_method = COALESCE($8, delivery_method), \
             is_active = COALESCE($9, is_active), \
             updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(&data.name)
        .bind(data.format)
        .bind(&data.field_selection)
        .bind(&data.field_ordering)
        .bind(data.filters.as_ref().map(Json))
        .bind(data.delivery_method)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update export profile", e))
    }

    /// Delete a profile.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM export_profiles WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete export profile", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
