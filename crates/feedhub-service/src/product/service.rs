//! Product listings and manual category assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_core::result::AppResult;
use feedhub_core::types::{PageRequest, PageResponse};
use feedhub_database::repositories::{
    CategoryRepository, MappedProductRepository, RawProductRepository, SupplierRepository,
};
use feedhub_entity::product::{MappedProduct, RawProduct};

use crate::context::RequestContext;

/// Narrowing of the mapped product listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Only products of this supplier.
    pub supplier_id: Option<Uuid>,
    /// Only products in this category.
    pub category_id: Option<Uuid>,
}

/// Read access to ingested and mapped products.
#[derive(Debug, Clone)]
pub struct ProductService {
    supplier_repo: Arc<SupplierRepository>,
    raw_repo: Arc<RawProductRepository>,
    mapped_repo: Arc<MappedProductRepository>,
    category_repo: Arc<CategoryRepository>,
}

impl ProductService {
    /// Creates a new product service.
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        raw_repo: Arc<RawProductRepository>,
        mapped_repo: Arc<MappedProductRepository>,
        category_repo: Arc<CategoryRepository>,
    ) -> Self {
        Self {
            supplier_repo,
            raw_repo,
            mapped_repo,
            category_repo,
        }
    }

    /// Raw rows of a supplier.
    pub async fn list_raw(
        &self,
        ctx: &RequestContext,
        supplier_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<(Vec<RawProduct>, PageResponse)> {
        self.supplier_repo
            .find(ctx.workspace_id, supplier_id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found"))?;
        self.raw_repo
            .list_for_supplier(ctx.workspace_id, supplier_id, page)
            .await
    }

    /// Mapped products of the active workspace.
    pub async fn list_mapped(
        &self,
        ctx: &RequestContext,
        filter: ProductFilter,
        page: &PageRequest,
    ) -> AppResult<(Vec<MappedProduct>, PageResponse)> {
        self.mapped_repo
            .list(ctx.workspace_id, filter.supplier_id, filter.category_id, page)
            .await
    }

    /// Set or clear a product's category.
    pub async fn assign_category(
        &self,
        ctx: &RequestContext,
        product_id: Uuid,
        category_id: Option<Uuid>,
    ) -> AppResult<MappedProduct> {
        ctx.require_editor()?;
        if let Some(category_id) = category_id {
            self.category_repo
                .find(ctx.workspace_id, category_id)
                .await?
                .ok_or_else(|| AppError::validation("Category not found"))?;
        }
        let product = self
            .mapped_repo
            .assign_category(ctx.workspace_id, product_id, category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;
        info!(
            workspace_id = %ctx.workspace_id,
            product_id = %product_id,
            category_id = ?category_id,
            "Product category assigned"
        );
        Ok(product)
    }
}
