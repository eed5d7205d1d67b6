//! Custom field handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::dto::request::{CreateFieldBody, ReorderFieldsRequest, UpdateFieldBody};
use crate::extractors::{ValidatedJson, WorkspaceContext};
use crate::state::AppState;

/// GET /api/fields
pub async fn list_fields(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
) -> Result<Json<serde_json::Value>, AppError> {
    let fields = state.field_service.list(&ctx).await?;
    Ok(Json(serde_json::json!({ "fields": fields })))
}

/// POST /api/fields
pub async fn create_field(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<CreateFieldBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let field = state.field_service.create(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "field": field }))))
}

/// PUT/PATCH /api/fields/{id}
pub async fn update_field(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFieldBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let field = state.field_service.update(&ctx, id, req.into()).await?;
    Ok(Json(serde_json::json!({ "field": field })))
}

/// DELETE /api/fields/{id}
pub async fn delete_field(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.field_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/fields/order
pub async fn reorder_fields(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<ReorderFieldsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let fields = state.field_service.reorder(&ctx, &req.ids).await?;
    Ok(Json(serde_json::json!({ "fields": fields })))
}
