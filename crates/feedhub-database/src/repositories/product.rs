//! Raw and mapped product repository implementations.

use std::collections::HashMap;

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_core::types::pagination::{PageRequest, PageResponse};
use feedhub_entity::product::{MappedProduct, NewMappedProduct, NewRawProduct, RawProduct};

/// Keep the last occurrence of each external id, preserving first-seen order.
fn dedupe_last_wins<T, F>(rows: &[T], key: F) -> Vec<&T>
where
    F: Fn(&T) -> &str,
{
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut unique: Vec<&T> = Vec::with_capacity(rows.len());
    for row in rows {
        match position.get(key(row)) {
            Some(&index) => unique[index] = row,
            None => {
                position.insert(key(row), unique.len());
                unique.push(row);
            }
        }
    }
    unique
}

/// Repository for supplier items as ingested.
#[derive(Debug, Clone)]
pub struct RawProductRepository {
    pool: PgPool,
}

impl RawProductRepository {
    /// Create a new raw product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert one batch keyed by (workspace, supplier, external id).
    ///
    /// Duplicate external ids within the batch collapse to the last one.
    /// Returns the number of rows written.
    pub async fn upsert_batch(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        ingestion_id: Uuid,
        rows: &[NewRawProduct],
    ) -> AppResult<u64> {
        let unique = dedupe_last_wins(rows, |r| r.external_id.as_str());
        if unique.is_empty() {
            return Ok(0);
        }
        let external_ids: Vec<String> = unique.iter().map(|r| r.external_id.clone()).collect();
        let data: Vec<Value> = unique
            .iter()
            .map(|r| Value::Object(r.data.clone()))
            .collect();

        let result = sqlx::query(
            "INSERT INTO raw_products (workspace_id, supplier_id, ingestion_id, external_id, data) \
             SELECT $1, $2, $3, t.external_id, t.data \
             FROM UNNEST($4::text[], $5::jsonb[]) AS t(external_id, data) \
             ON CONFLICT ON CONSTRAINT raw_products_external_key DO UPDATE SET \
             data = EXCLUDED.data, ingestion_id = EXCLUDED.ingestion_id, updated_at = NOW()",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(ingestion_id)
        .bind(&external_ids)
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert raw products", e))?;

        Ok(result.rows_affected())
    }

    /// List a supplier's raw rows by external id.
    pub async fn list_for_supplier(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<(Vec<RawProduct>, PageResponse)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM raw_products WHERE workspace_id = $1 AND supplier_id = $2",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count raw products", e))?;

        let rows = sqlx::query_as::<_, RawProduct>(
            "SELECT * FROM raw_products WHERE workspace_id = $1 AND supplier_id = $2 \
             ORDER BY external_id ASC LIMIT $3 OFFSET $4",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list raw products", e))?;

        Ok((rows, PageResponse::new(page, total as u64)))
    }

    /// The most recently written raw rows of a supplier.
    pub async fn recent_for_supplier(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<RawProduct>> {
        sqlx::query_as::<_, RawProduct>(
            "SELECT * FROM raw_products WHERE workspace_id = $1 AND supplier_id = $2 \
             ORDER BY updated_at DESC, external_id ASC LIMIT $3",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load raw products", e))
    }
}

/// Repository for schema-aligned products.
#[derive(Debug, Clone)]
pub struct MappedProductRepository {
    pool: PgPool,
}

impl MappedProductRepository {
    /// Create a new mapped product repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert mapped rows keyed by (workspace, supplier, external id).
    ///
    /// A row whose category did not resolve keeps its current category.
    pub async fn upsert_batch(
        &self,
        workspace_id: Uuid,
        supplier_id: Uuid,
        rows: &[NewMappedProduct],
    ) -> AppResult<u64> {
        let unique = dedupe_last_wins(rows, |r| r.external_id.as_str());
        if unique.is_empty() {
            return Ok(0);
        }
        let external_ids: Vec<String> = unique.iter().map(|r| r.external_id.clone()).collect();
        let raw_ids: Vec<Uuid> = unique.iter().map(|r| r.raw_product_id).collect();
        let category_ids: Vec<Option<Uuid>> = unique.iter().map(|r| r.category_id).collect();
        let data: Vec<Value> = unique
            .iter()
            .map(|r| Value::Object(r.data.clone()))
            .collect();

        let result = sqlx::query(
            "INSERT INTO mapped_products \
             (workspace_id, supplier_id, external_id, raw_product_id, category_id, data) \
             SELECT $1, $2, t.external_id, t.raw_product_id, t.category_id, t.data \
             FROM UNNEST($3::text[], $4::uuid[], $5::uuid[], $6::jsonb[]) \
             AS t(external_id, raw_product_id, category_id, data) \
             ON CONFLICT ON CONSTRAINT mapped_products_external_key DO UPDATE SET \
             raw_product_id = EXCLUDED.raw_product_id, \
             category_id = COALESCE(EXCLUDED.category_id, mapped_products.category_id), \
             data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(&external_ids)
        .bind(&raw_ids)
        .bind(&category_ids)
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert mapped products", e)
        })?;

        Ok(result.rows_affected())
    }

    /// Find a mapped product within a workspace.
    pub async fn find(&self, workspace_id: Uuid, id: Uuid) -> AppResult<Option<MappedProduct>> {
        sqlx::query_as::<_, MappedProduct>(
            "SELECT * FROM mapped_products WHERE workspace_id = $1 AND id = $2",
        )
        .bind(workspace_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find product", e))
    }

    /// List mapped products, optionally narrowed to a supplier and a category.
    pub async fn list(
        &self,
        workspace_id: Uuid,
        supplier_id: Option<Uuid>,
        category_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<(Vec<MappedProduct>, PageResponse)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mapped_products WHERE workspace_id = $1 \
             AND ($2::uuid IS NULL OR supplier_id = $2) \
             AND ($3::uuid IS NULL OR category_id = $3)",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count products", e))?;

        let rows = sqlx::query_as::<_, MappedProduct>(
            "SELECT * FROM mapped_products WHERE workspace_id = $1 \
             AND ($2::uuid IS NULL OR supplier_id = $2) \
             AND ($3::uuid IS NULL OR category_id = $3) \
             ORDER BY supplier_id, external_id LIMIT $4 OFFSET $5",
        )
        .bind(workspace_id)
        .bind(supplier_id)
        .bind(category_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list products", e))?;

        Ok((rows, PageResponse::new(page, total as u64)))
    }

    /// Every mapped product of a workspace, in a stable order for exports.
    pub async fn list_for_export(&self, workspace_id: Uuid) -> AppResult<Vec<MappedProduct>> {
        sqlx::query_as::<_, MappedProduct>(
            "SELECT * FROM mapped_products WHERE workspace_id = $1 \
             ORDER BY supplier_id, external_id",
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load export rows", e))
    }

    /// Set or clear the category of a product.
    pub async fn assign_category(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<Option<MappedProduct>> {
        sqlx::query_as::<_, MappedProduct>(
            "UPDATE mapped_products SET category_id = $3, updated_at = NOW() \
             WHERE workspace_id = $1 AND id = $2 RETURNING *",
        )
        .bind(workspace_id)
        .bind(id)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign category", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_last_value_at_first_position() {
        let rows = vec![("A", 1), ("B", 2), ("A", 3)];
        let unique = dedupe_last_wins(&rows, |r| r.0);
        assert_eq!(unique, vec![&("A", 3), &("B", 2)]);
    }
}
