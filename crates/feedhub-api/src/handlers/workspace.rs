//! Workspace and membership handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::dto::request::{AddMemberRequest, CreateWorkspaceRequest};
use crate::extractors::{ACTIVE_WORKSPACE_COOKIE, AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/workspaces
pub async fn list_workspaces(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let workspaces = state.workspace_service.list_for_user(auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "workspaces": workspaces })))
}

/// POST /api/workspaces
pub async fn create_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let workspace = state
        .workspace_service
        .create(auth.user_id(), auth.email(), &req.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "workspace": workspace })),
    ))
}

/// POST /api/workspaces/{id}/activate
///
/// Verifies membership and remembers the workspace in a cookie.
pub async fn activate_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> Result<(CookieJar, Json<serde_json::Value>), AppError> {
    let ctx = state
        .workspace_service
        .resolve_context(auth.user_id(), auth.0.email.clone(), id)
        .await?;

    let cookie = Cookie::build((ACTIVE_WORKSPACE_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(serde_json::json!({ "workspace_id": id, "role": ctx.role })),
    ))
}

/// GET /api/workspaces/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ctx = state
        .workspace_service
        .resolve_context(auth.user_id(), auth.0.email.clone(), id)
        .await?;
    let members = state.workspace_service.list_members(&ctx).await?;
    Ok(Json(serde_json::json!({ "members": members })))
}

/// POST /api/workspaces/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ctx = state
        .workspace_service
        .resolve_context(auth.user_id(), auth.0.email.clone(), id)
        .await?;
    let member = state
        .workspace_service
        .add_member(&ctx, req.user_id, req.email.as_deref(), req.role)
        .await?;
    Ok(Json(serde_json::json!({ "member": member })))
}
