//! `WorkspaceContext` extractor: resolves the active workspace and the caller's role in it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use feedhub_core::error::AppError;
use feedhub_service::RequestContext;

use crate::extractors::auth::AuthUser;
use crate::state::AppState;

/// Header selecting the active workspace. Takes precedence over the cookie.
pub const WORKSPACE_HEADER: &str = "x-workspace-id";

/// Cookie remembering the active workspace.
pub const ACTIVE_WORKSPACE_COOKIE: &str = "active_workspace";

/// A verified caller acting inside a workspace they belong to.
#[derive(Debug, Clone)]
pub struct WorkspaceContext(pub RequestContext);

impl std::ops::Deref for WorkspaceContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Read the requested workspace ID from the header or the cookie.
pub fn requested_workspace(parts: &Parts) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(WORKSPACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(ACTIVE_WORKSPACE_COOKIE)
                .map(|c| c.value().to_string())
        })
        .ok_or_else(|| AppError::validation("No active workspace selected"))?;

    Uuid::parse_str(raw.trim()).map_err(|_| AppError::validation("Invalid workspace ID"))
}

impl FromRequestParts<AppState> for WorkspaceContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let workspace_id = requested_workspace(parts)?;

        let ctx = state
            .workspace_service
            .resolve_context(user.user_id(), user.0.email.clone(), workspace_id)
            .await?;
        Ok(WorkspaceContext(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/suppliers");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let header_id = Uuid::new_v4();
        let cookie_id = Uuid::new_v4();
        let cookie = format!("{ACTIVE_WORKSPACE_COOKIE}={cookie_id}");
        let parts = parts(&[
            (WORKSPACE_HEADER, &header_id.to_string()),
            ("cookie", &cookie),
        ]);
        assert_eq!(requested_workspace(&parts).unwrap(), header_id);
    }

    #[test]
    fn test_cookie_fallback_and_errors() {
        let id = Uuid::new_v4();
        let cookie = format!("theme=dark; {ACTIVE_WORKSPACE_COOKIE}={id}");
        assert_eq!(requested_workspace(&parts(&[("cookie", &cookie)])).unwrap(), id);

        assert!(requested_workspace(&parts(&[])).is_err());
        assert!(requested_workspace(&parts(&[(WORKSPACE_HEADER, "nope")])).is_err());
    }
}
