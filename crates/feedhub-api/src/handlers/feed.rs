//! Public live feed endpoint.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use feedhub_core::error::AppError;

use crate::state::AppState;

/// Split `"{uuid}"` or `"{uuid}.{ext}"` into its parts.
pub fn parse_feed_name(name: &str) -> Option<(Uuid, Option<&str>)> {
    let (id, ext) = match name.split_once('.') {
        Some((id, ext)) => (id, Some(ext)),
        None => (name, None),
    };
    Uuid::parse_str(id).ok().map(|id| (id, ext))
}

/// GET /feed/{profile_id}[.csv|.json|.xml]
///
/// Unauthenticated. Serves active profiles with the `feed` delivery
/// method; everything else is a 404.
pub async fn live_feed(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let (profile_id, extension) =
        parse_feed_name(&name).ok_or_else(|| AppError::not_found("Feed not found"))?;

    let feed = state
        .export_service
        .live_feed(profile_id, extension)
        .await?;
    tracing::debug!(%profile_id, bytes = feed.body.len(), "Served live feed");

    let disposition = format!("inline; filename=\"{}\"", feed.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, feed.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "public, max-age=300".to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        feed.body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_name() {
        let id = Uuid::new_v4();
        assert_eq!(parse_feed_name(&id.to_string()), Some((id, None)));
        assert_eq!(parse_feed_name(&format!("{id}.xml")), Some((id, Some("xml"))));
        assert_eq!(parse_feed_name("not-a-uuid.csv"), None);
        assert_eq!(parse_feed_name(""), None);
    }
}
