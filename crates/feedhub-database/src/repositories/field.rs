//! Custom field repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::field::{CreateCustomField, CustomField, UpdateCustomField};

use super::violates;

const KEY_UNIQUE: &str = "custom_fields_workspace_key_key";
const KEY_FORMAT: &str = "custom_fields_key_format_check";

fn map_write_error(err: sqlx::Error, action: &'static str) -> AppError {
    if violates(&err, KEY_UNIQUE) {
        AppError::conflict("A field with this key already exists")
    } else if violates(&err, KEY_FORMAT) {
        AppError::validation("Field key must match [a-z0-9_]+")
    } else {
        AppError::with_source(ErrorKind::Database, action, err)
    }
}

/// Repository for the workspace product schema.
#[derive(Debug, Clone)]
pub struct CustomFieldRepository {
    pool: PgPool,
}

impl CustomFieldRepository {
    /// Create a new custom field repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a field; without an explicit position it is appended last.
    pub async fn create(&self, data: &CreateCustomField) -> AppResult<CustomField> {
        sqlx::query_as::<_, CustomField>(
            "INSERT INTO custom_fields \
             (workspace_id, key, name, datatype, sort_order, is_visible, is_category_field) \
             VALUES ($1, $2, $3, $4, \
                COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0) \
                              FROM custom_fields WHERE workspace_id = $1)), \
                $6, $7) \
             RETURNING *",
        )
        .bind(data.workspace_id)
        .bind(&data.key)
        .bind(&data.name)
        .bind(data.datatype)
        .bind(data.sort_order)
        .bind(data.is_visible)
        .bind(data.is_category_field)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create field"))
    }

    /// List fields in display order.
    pub async fn list(&self, workspace_id: Uuid) -> AppResult<Vec<CustomField>> {
        sqlx::query_as::<_, CustomField>(
            "SELECT * FROM custom_fields WHERE workspace_id = $1 ORDER BY sort_order ASC, key ASC",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list fields", e))
    }

    /// Find a field within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<CustomField>> {
        sqlx::query_as::<_, CustomField>(
            "SELECT * FROM custom_fields WHERE workspace_id = $1 AND id = $2",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find field", e))
    }

    /// Apply a partial update. Renamed keys propagate to mappings.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        data: &UpdateCustomField,
    ) -> AppResult<Option<CustomField>> {
        sqlx::query_as::<_, CustomField>(
            "UPDATE custom_fields SET \
             key = COALESCE($3, key), \
             name = COALESCE($4, name), \
             datatype = COALESCE($5, datatype), \
             sort_order = COALESCE($6, sort_order), \
             is_visible = COALESCE($7, is_visible), \
             is_category_field = COALESCE($8, is_category_field), \
             updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(&data.key)
        .bind(&data.name)
        .bind(data.datatype)
        .bind(data.sort_order)
        .bind(data.is_visible)
        .bind(data.is_category_field)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update field"))
    }

    /// Delete a field; its mappings go with it.
    pub async fn delete(&self, workspace_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete field", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Assign `sort_order` by position in `ids`. Unknown ids are ignored.
    pub async fn reorder(&self, workspace_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE custom_fields f SET sort_order = t.position - 1, updated_at = NOW() \
             FROM UNNEST($2::uuid[]) WITH ORDINALITY AS t(id, position) \
             WHERE f.workspace_id = $1 AND f.id = t.id",
        )
        .bind(workspace_id)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reorder fields", e))?;
        Ok(result.rows_affected())
    }
}
