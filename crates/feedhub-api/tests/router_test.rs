//! Router tests for requests that are answered without touching the database.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_is_public() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_unreachable_database() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health/ready", None, &[]).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["database"], "unreachable");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/suppliers", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "UNAUTHORIZED");
    assert_eq!(response.body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let response = app
        .request(
            "GET",
            "/api/workspaces",
            None,
            &[("Authorization", "Bearer not.a.jwt")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_workspace_selection_is_required() {
    let app = helpers::TestApp::new().await;
    let auth = format!("Bearer {}", app.token());
    let response = app
        .request("GET", "/api/fields", None, &[("Authorization", &auth)])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No active workspace selected");
}

#[tokio::test]
async fn test_malformed_workspace_header_is_rejected() {
    let app = helpers::TestApp::new().await;
    let auth = format!("Bearer {}", app.token());
    let response = app
        .request(
            "GET",
            "/api/categories",
            None,
            &[("Authorization", &auth), ("X-Workspace-Id", "acme")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_workspace_validates_name() {
    let app = helpers::TestApp::new().await;
    let auth = format!("Bearer {}", app.token());
    let response = app
        .request(
            "POST",
            "/api/workspaces",
            Some(serde_json::json!({ "name": "" })),
            &[("Authorization", &auth)],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_public_feed_with_bad_id_is_not_found() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/feed/not-a-profile.xml", None, &[]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/nope", None, &[]).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
