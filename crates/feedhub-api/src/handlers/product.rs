//! Mapped product handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_service::product::ProductFilter;

use crate::dto::request::AssignCategoryRequest;
use crate::extractors::{PaginationParams, ValidatedJson, WorkspaceContext};
use crate::state::AppState;

/// GET /api/products?supplier_id=&category_id=
pub async fn list_products(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let (products, page) = state
        .product_service
        .list_mapped(&ctx, filter, &page)
        .await?;
    Ok(Json(serde_json::json!({ "products": products, "page": page })))
}

/// PUT /api/products/{id}/category
pub async fn assign_category(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AssignCategoryRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let product = state
        .product_service
        .assign_category(&ctx, id, req.category_id)
        .await?;
    Ok(Json(serde_json::json!({ "product": product })))
}
