//! Applies a supplier's field mappings to its raw rows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use feedhub_core::config::FeedConfig;
use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_database::repositories::{
    CategoryRepository, CustomFieldRepository, FieldMappingRepository, MappedProductRepository,
    RawProductRepository, SupplierRepository,
};
use feedhub_entity::field::{FieldMapping, NewFieldMapping};
use feedhub_entity::product::NewMappedProduct;
use feedhub_feed::mapping::{CategoryMatcher, MappingPlan};

use crate::context::RequestContext;

/// Counts reported by a mapping run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    /// Raw rows read.
    pub processed: u64,
    /// Mapped rows written.
    pub upserted: u64,
    /// Rows whose category resolved.
    pub categorized: u64,
}

/// Manages field mappings and produces mapped products.
#[derive(Debug, Clone)]
pub struct MappingService {
    supplier_repo: Arc<SupplierRepository>,
    field_repo: Arc<CustomFieldRepository>,
    mapping_repo: Arc<FieldMappingRepository>,
    raw_repo: Arc<RawProductRepository>,
    mapped_repo: Arc<MappedProductRepository>,
    category_repo: Arc<CategoryRepository>,
    config: FeedConfig,
}

impl MappingService {
    /// Creates a new mapping service.
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        field_repo: Arc<CustomFieldRepository>,
        mapping_repo: Arc<FieldMappingRepository>,
        raw_repo: Arc<RawProductRepository>,
        mapped_repo: Arc<MappedProductRepository>,
        category_repo: Arc<CategoryRepository>,
        config: FeedConfig,
    ) -> Self {
        Self {
            supplier_repo,
            field_repo,
            mapping_repo,
            raw_repo,
            mapped_repo,
            category_repo,
            config,
        }
    }

    async fn require_supplier(&self, ctx: &RequestContext, supplier_id: Uuid) -> AppResult<()> {
        self.supplier_repo
            .find(ctx.workspace_id, supplier_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Supplier not found"))
    }

    /// List a supplier's mappings.
    pub async fn list(&self, ctx: &RequestContext, supplier_id: Uuid) -> AppResult<Vec<FieldMapping>> {
        self.require_supplier(ctx, supplier_id).await?;
        self.mapping_repo
            .list_for_supplier(ctx.workspace_id, supplier_id)
            .await
    }

    /// Replace all mappings of a supplier.
    ///
    /// Blank entries are dropped; every field key must name an existing
    /// custom field and each source key may appear once.
    pub async fn replace(
        &self,
        ctx: &RequestContext,
        supplier_id: Uuid,
        mappings: Vec<NewFieldMapping>,
    ) -> AppResult<Vec<FieldMapping>> {
        ctx.require_editor()?;
        self.require_supplier(ctx, supplier_id).await?;

        let mut cleaned: Vec<NewFieldMapping> = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let source_key = mapping.source_key.trim().to_string();
            let field_key = mapping.field_key.trim().to_string();
            if source_key.is_empty() || field_key.is_empty() {
                continue;
            }
            if cleaned.iter().any(|m| m.source_key == source_key) {
                return Err(AppError::validation(format!(
                    "Source key '{source_key}' is mapped more than once"
                )));
            }
            cleaned.push(NewFieldMapping {
                source_key,
                field_key,
            });
        }

        let saved = self
            .mapping_repo
            .replace_all(ctx.workspace_id, supplier_id, &cleaned)
            .await?;
        info!(
            workspace_id = %ctx.workspace_id,
            supplier_id = %supplier_id,
            mappings = saved.len(),
            "Field mappings replaced"
        );
        Ok(saved)
    }

    /// Delete one mapping.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        supplier_id: Uuid,
        mapping_id: Uuid,
    ) -> AppResult<()> {
        ctx.require_editor()?;
        if !self
            .mapping_repo
            .delete(ctx.workspace_id, supplier_id, mapping_id)
            .await?
        {
            return Err(AppError::not_found("Mapping not found"));
        }
        Ok(())
    }

    /// Run the mapping step for a supplier of the active workspace.
    pub async fn run(&self, ctx: &RequestContext, supplier_id: Uuid) -> AppResult<MappingResult> {
        ctx.require_editor()?;
        self.require_supplier(ctx, supplier_id).await?;
        self.run_for(ctx.workspace_id, supplier_id).await
    }

    /// Map the most recent raw rows of a supplier into mapped products.
    ///
    /// Idempotent: rows are upserted by (workspace, supplier, external id).
    pub async fn run_for(&self, workspace_id: Uuid, supplier_id: Uuid) -> AppResult<MappingResult> {
        let fields = self.field_repo.list(workspace_id).await?;
        if fields.is_empty() {
            info!(%workspace_id, %supplier_id, "No custom fields defined; skipping mapping");
            return Ok(MappingResult::default());
        }

        let mappings = self
            .mapping_repo
            .list_for_supplier(workspace_id, supplier_id)
            .await?;
        let plan = MappingPlan::new(
            fields.iter().map(|f| f.target()).collect(),
            mappings
                .iter()
                .map(|m| (m.source_key.as_str(), m.field_key.as_str())),
        );

        let categories = if fields.iter().any(|f| f.is_category_field) {
            self.category_repo.list(workspace_id).await?
        } else {
            Vec::new()
        };
        let matcher = CategoryMatcher::new(
            categories
                .iter()
                .map(|c| (c.id, c.path.as_str(), c.name.as_str())),
        );

        let raw_rows = self
            .raw_repo
            .recent_for_supplier(workspace_id, supplier_id, self.config.mapping_row_limit)
            .await?;

        let mut result = MappingResult {
            processed: raw_rows.len() as u64,
            ..MappingResult::default()
        };
        let mapped: Vec<NewMappedProduct> = raw_rows
            .iter()
            .map(|raw| {
                let row = plan.apply(&raw.data.0, &matcher);
                NewMappedProduct {
                    external_id: raw.external_id.clone(),
                    raw_product_id: raw.id,
                    category_id: row.category_id,
                    data: row.data,
                }
            })
            .collect();
        result.categorized = mapped.iter().filter(|m| m.category_id.is_some()).count() as u64;

        for chunk in mapped.chunks(self.config.insert_batch_size.max(1)) {
            result.upserted += self
                .mapped_repo
                .upsert_batch(workspace_id, supplier_id, chunk)
                .await?;
        }

        info!(
            %workspace_id,
            %supplier_id,
            processed = result.processed,
            upserted = result.upserted,
            categorized = result.categorized,
            "Mapping run finished"
        );
        Ok(result)
    }
}
