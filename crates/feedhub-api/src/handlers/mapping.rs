//! Field mapping handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::dto::request::ReplaceMappingsRequest;
use crate::extractors::{ValidatedJson, WorkspaceContext};
use crate::state::AppState;

/// GET /api/suppliers/{id}/mappings
pub async fn list_mappings(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(supplier_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mappings = state.mapping_service.list(&ctx, supplier_id).await?;
    Ok(Json(serde_json::json!({ "mappings": mappings })))
}

/// PUT /api/suppliers/{id}/mappings
pub async fn replace_mappings(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(supplier_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ReplaceMappingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mappings = state
        .mapping_service
        .replace(&ctx, supplier_id, req.mappings)
        .await?;
    Ok(Json(serde_json::json!({ "mappings": mappings })))
}

/// DELETE /api/suppliers/{id}/mappings/{mapping_id}
pub async fn delete_mapping(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path((supplier_id, mapping_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .mapping_service
        .delete(&ctx, supplier_id, mapping_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/suppliers/{id}/map
pub async fn run_mapping(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(supplier_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = state.mapping_service.run(&ctx, supplier_id).await?;
    Ok(Json(serde_json::json!({ "mapping": result })))
}
