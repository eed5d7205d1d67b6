//! Ingestion run handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::extractors::{PaginationParams, WorkspaceContext};
use crate::state::AppState;

/// GET /api/suppliers/{id}/ingestions
pub async fn list_ingestions(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(supplier_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.into_page_request();
    let (ingestions, page) = state
        .ingestion_service
        .list_for_supplier(&ctx, supplier_id, &page)
        .await?;
    Ok(Json(serde_json::json!({ "ingestions": ingestions, "page": page })))
}

/// GET /api/ingestions/{id}
pub async fn get_ingestion(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ingestion = state.ingestion_service.get(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "ingestion": ingestion })))
}
