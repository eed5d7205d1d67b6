//! Supplier CRUD, upload, sniff and sync handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::dto::request::{CreateSupplierBody, SniffRequest, UpdateSupplierBody};
use crate::dto::response::SupplierResponse;
use crate::extractors::{PaginationParams, ValidatedJson, WorkspaceContext};
use crate::state::AppState;

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let (suppliers, page) = state.supplier_service.list(&ctx, &page).await?;
    let suppliers: Vec<SupplierResponse> = suppliers.into_iter().map(Into::into).collect();
    Ok(Json(serde_json::json!({ "suppliers": suppliers, "page": page })))
}

/// POST /api/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<CreateSupplierBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let supplier = state.supplier_service.create(&ctx, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "supplier": SupplierResponse::from(supplier) })),
    ))
}

/// GET /api/suppliers/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let supplier = state.supplier_service.get(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "supplier": SupplierResponse::from(supplier) })))
}

/// PUT/PATCH /api/suppliers/{id}
pub async fn update_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateSupplierBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let supplier = state.supplier_service.update(&ctx, id, req.into()).await?;
    Ok(Json(serde_json::json!({ "supplier": SupplierResponse::from(supplier) })))
}

/// DELETE /api/suppliers/{id}
pub async fn delete_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.supplier_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/suppliers/{id}/upload (multipart, field `file`)
pub async fn upload_feed(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("feed").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        upload = Some((file_name, data));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::validation("Multipart field 'file' is required"))?;
    let supplier = state
        .supplier_service
        .upload(&ctx, id, &file_name, data)
        .await?;
    Ok(Json(serde_json::json!({ "supplier": SupplierResponse::from(supplier) })))
}

/// POST /api/sniff
pub async fn sniff_url(
    State(state): State<AppState>,
    _ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<SniffRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state
        .supplier_service
        .sniff_url(&req.url, req.feed_type, &req.credentials)
        .await?;
    Ok(Json(serde_json::to_value(result)?))
}

/// POST /api/suppliers/{id}/sniff
pub async fn sniff_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state.supplier_service.sniff_supplier(&ctx, id).await?;
    Ok(Json(serde_json::to_value(result)?))
}

/// POST /api/suppliers/{id}/sync
pub async fn sync_supplier(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.ingestion_service.sync(&ctx, id).await?;
    Ok(Json(serde_json::to_value(outcome)?))
}

/// POST /api/suppliers/sync-all
pub async fn sync_all(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
) -> Result<Json<serde_json::Value>, AppError> {
    let results = state.ingestion_service.sync_all(&ctx).await?;
    Ok(Json(serde_json::json!({ "results": results })))
}

/// GET /api/suppliers/{id}/raw-products
pub async fn list_raw_products(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let (products, page) = state.product_service.list_raw(&ctx, id, &page).await?;
    Ok(Json(serde_json::json!({ "products": products, "page": page })))
}
