//! Category tree handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::extractors::{ValidatedJson, WorkspaceContext};
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
) -> Result<Json<serde_json::Value>, AppError> {
    let categories = state.category_service.list(&ctx).await?;
    Ok(Json(serde_json::json!({ "categories": categories })))
}

/// GET /api/categories/tree
pub async fn category_tree(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
) -> Result<Json<serde_json::Value>, AppError> {
    let tree = state.category_service.tree(&ctx).await?;
    Ok(Json(serde_json::json!({ "tree": tree })))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category = state.category_service.get(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "category": category })))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let category = state
        .category_service
        .create(&ctx, &req.name, req.parent_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "category": category })),
    ))
}

/// PUT/PATCH /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category = state
        .category_service
        .update(&ctx, id, req.name.as_deref(), req.parent_id)
        .await?;
    Ok(Json(serde_json::json!({ "category": category })))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
