//! Export profile handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_entity::export::{ExportProfile, UpdateExportProfile};

use crate::dto::request::CreateExportBody;
use crate::dto::response::ExportProfileResponse;
use crate::extractors::{ValidatedJson, WorkspaceContext};
use crate::state::AppState;

fn with_feed_url(state: &AppState, profile: ExportProfile) -> ExportProfileResponse {
    ExportProfileResponse {
        feed_url: state.export_service.feed_url(&profile),
        profile,
    }
}

/// GET /api/exports
pub async fn list_exports(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
) -> Result<Json<serde_json::Value>, AppError> {
    let exports: Vec<ExportProfileResponse> = state
        .export_service
        .list(&ctx)
        .await?
        .into_iter()
        .map(|p| with_feed_url(&state, p))
        .collect();
    Ok(Json(serde_json::json!({ "exports": exports })))
}

/// POST /api/exports
pub async fn create_export(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    ValidatedJson(req): ValidatedJson<CreateExportBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let profile = state.export_service.create(&ctx, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "export": with_feed_url(&state, profile) })),
    ))
}

/// GET /api/exports/{id}
pub async fn get_export(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = state.export_service.get(&ctx, id).await?;
    Ok(Json(serde_json::json!({ "export": with_feed_url(&state, profile) })))
}

/// PUT/PATCH /api/exports/{id}
pub async fn update_export(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateExportProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = state.export_service.update(&ctx, id, req).await?;
    Ok(Json(serde_json::json!({ "export": with_feed_url(&state, profile) })))
}

/// DELETE /api/exports/{id}
pub async fn delete_export(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.export_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/exports/{id}/download
pub async fn download_export(
    State(state): State<AppState>,
    ctx: WorkspaceContext,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let export = state.export_service.download(&ctx, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, export.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}
