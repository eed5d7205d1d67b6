//! Field mapping repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::field::{FieldMapping, NewFieldMapping};

use super::violates;

/// Repository for supplier source key to custom field mappings.
#[derive(Debug, Clone)]
pub struct FieldMappingRepository {
    pool: PgPool,
}

impl FieldMappingRepository {
    /// Create a new field mapping repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a supplier's mappings by source key.
    pub async fn list_for_supplier(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
    ) -> AppResult<Vec<FieldMapping>> {
        sqlx::query_as::<_, FieldMapping>(
            "SELECT * FROM field_mappings WHERE workspace_id = $1 AND supplier_id = $2 \
             ORDER BY source_key ASC",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list mappings", e))
    }

    /// Replace all mappings of a supplier in one transaction.
    pub async fn replace_all(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        mappings: &[NewFieldMapping],
    ) -> AppResult<Vec<FieldMapping>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM field_mappings WHERE workspace_id = $1 AND supplier_id = $2")
            .bind(workspace_id)
            .bind(supplier_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear mappings", e))?;

        let source_keys: Vec<&str> = mappings.iter().map(|m| m.source_key.as_str()).collect();
        let field_keys: Vec<&str> = mappings.iter().map(|m| m.field_key.as_str()).collect();

        let mut saved = sqlx::query_as::<_, FieldMapping>(
            "INSERT INTO field_mappings (workspace_id, supplier_id, source_key, field_key) \
             SELECT $1, $2, t.source_key, t.field_key \
             FROM UNNEST($3::text[], $4::text[]) AS t(source_key, field_key) \
             RETURNING *",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(&source_keys)
        .bind(&field_keys)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            if violates(&e, "field_mappings_field_fkey") {
                AppError::validation("Mapping targets an unknown field")
            } else if violates(&e, "field_mappings_source_key") {
                AppError::validation("Each source key may be mapped only once")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to save mappings", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit mappings", e))?;

        saved.sort_by(|a, b| a.source_key.cmp(&b.source_key));
        Ok(saved)
    }

    /// Delete one mapping of a supplier.
    pub async fn delete(&self, workspace_id: Uuid, supplier_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM field_mappings WHERE workspace_id = $1 AND supplier_id = $2 AND id = $3",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete mapping", e))?;
        Ok(result.rows_affected() > 0)
    }
}
