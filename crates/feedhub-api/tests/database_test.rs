//! End-to-end tests against a real PostgreSQL database.
//!
//! Set `FEEDHUB_TEST_DATABASE_URL` to run them; without it every test
//! returns immediately.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use feedhub_database::repositories::ingestion::IngestionRepository;
use helpers::{TestApp, TestWorkspace};

async fn create_category(app: &TestApp, ws: &TestWorkspace, name: &str, parent: Option<&str>) -> String {
    let response = app
        .request(
            "POST",
            "/api/categories",
            Some(json!({ "name": name, "parent_id": parent })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["category"]["id"].as_str().expect("category id").to_string()
}

async fn category_path(app: &TestApp, ws: &TestWorkspace, id: &str) -> String {
    let response = app
        .request("GET", &format!("/api/categories/{id}"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["category"]["path"].as_str().expect("path").to_string()
}

async fn create_upload_supplier(app: &TestApp, ws: &TestWorkspace) -> String {
    let response = app
        .request(
            "POST",
            "/api/suppliers",
            Some(json!({ "name": "Acme", "source_type": "upload", "unique_key": "sku" })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["supplier"]["id"].as_str().expect("supplier id").to_string()
}

async fn create_field(app: &TestApp, ws: &TestWorkspace, key: &str, datatype: &str) {
    let response = app
        .request(
            "POST",
            "/api/fields",
            Some(json!({ "key": key, "datatype": datatype })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
}

async fn create_export(app: &TestApp, ws: &TestWorkspace, body: Value) -> String {
    let response = app
        .request("POST", "/api/exports", Some(body), &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["export"]["id"].as_str().expect("export id").to_string()
}

#[tokio::test]
async fn test_category_with_children_cannot_be_deleted() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    let electronics = create_category(&app, &ws, "Electronics", None).await;
    let phones = create_category(&app, &ws, "Phones", Some(&electronics)).await;

    let response = app
        .request("DELETE", &format!("/api/categories/{electronics}"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");

    let response = app
        .request("DELETE", &format!("/api/categories/{phones}"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app
        .request("DELETE", &format!("/api/categories/{electronics}"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_category_rename_and_move_recompute_subtree_paths() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    let electronics = create_category(&app, &ws, "Electronics", None).await;
    let phones = create_category(&app, &ws, "Phones", Some(&electronics)).await;
    let android = create_category(&app, &ws, "Android", Some(&phones)).await;
    assert_eq!(
        category_path(&app, &ws, &android).await,
        "Electronics > Phones > Android"
    );

    let response = app
        .request(
            "PATCH",
            &format!("/api/categories/{electronics}"),
            Some(json!({ "name": "Devices" })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(category_path(&app, &ws, &phones).await, "Devices > Phones");
    assert_eq!(
        category_path(&app, &ws, &android).await,
        "Devices > Phones > Android"
    );

    let response = app
        .request(
            "PATCH",
            &format!("/api/categories/{phones}"),
            Some(json!({ "parent_id": null })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(category_path(&app, &ws, &phones).await, "Phones");
    assert_eq!(category_path(&app, &ws, &android).await, "Phones > Android");
}

#[tokio::test]
async fn test_category_cannot_move_under_its_descendant() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    let electronics = create_category(&app, &ws, "Electronics", None).await;
    let phones = create_category(&app, &ws, "Phones", Some(&electronics)).await;
    let android = create_category(&app, &ws, "Android", Some(&phones)).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/categories/{electronics}"),
            Some(json!({ "parent_id": android })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(category_path(&app, &ws, &electronics).await, "Electronics");
    assert_eq!(
        category_path(&app, &ws, &android).await,
        "Electronics > Phones > Android"
    );
}

#[tokio::test]
async fn test_sync_while_run_in_flight_is_conflict() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    let supplier = create_upload_supplier(&app, &ws).await;
    let supplier_id = Uuid::parse_str(&supplier).expect("supplier id");

    IngestionRepository::new(app.db.pool().clone())
        .create_pending(ws.uuid(), supplier_id, None)
        .await
        .expect("pending run");

    let response = app
        .request("POST", &format!("/api/suppliers/{supplier}/sync"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_upload_sync_and_mapping_are_idempotent() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    create_field(&app, &ws, "sku", "string").await;
    create_field(&app, &ws, "price", "number").await;
    let supplier = create_upload_supplier(&app, &ws).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/suppliers/{supplier}/mappings"),
            Some(json!({ "mappings": [
                { "source_key": "sku", "field_key": "sku" },
                { "source_key": "price", "field_key": "price" }
            ] })),
            &ws.headers(),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let feed = b"sku,price\nA1,9.99\nA2,\"1,200\"\nA1,10.50\n";
    let response = app
        .upload(&format!("/api/suppliers/{supplier}/upload"), "feed.csv", feed, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request("POST", &format!("/api/suppliers/{supplier}/sync"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["ingestion"]["status"], "completed");
    assert_eq!(response.body["ingestion"]["items_total"], 3);
    assert_eq!(response.body["ingestion"]["items_ok"], 2);
    assert_eq!(response.body["ingestion"]["items_error"], 1);
    assert_eq!(response.body["mapping"]["upserted"], 2);

    let response = app
        .request("POST", &format!("/api/suppliers/{supplier}/map"), None, &ws.headers())
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["mapping"]["processed"], 2);

    let response = app.request("GET", "/api/products", None, &ws.headers()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["page"]["total_items"], 2);
    let products = response.body["products"].as_array().expect("products");
    let a1 = products
        .iter()
        .find(|p| p["external_id"] == "A1")
        .expect("A1 mapped");
    assert_eq!(a1["data"], json!({ "sku": "A1", "price": 10.5 }));
    let a2 = products
        .iter()
        .find(|p| p["external_id"] == "A2")
        .expect("A2 mapped");
    assert_eq!(a2["data"]["price"], json!(1200));
}

#[tokio::test]
async fn test_live_feed_serves_only_active_feed_profiles() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let ws = app.workspace().await;
    create_field(&app, &ws, "sku", "string").await;

    let live = create_export(
        &app,
        &ws,
        json!({ "name": "Live", "format": "csv", "delivery_method": "feed", "is_active": true }),
    )
    .await;
    let download = create_export(
        &app,
        &ws,
        json!({ "name": "Download", "format": "csv", "delivery_method": "download" }),
    )
    .await;
    let inactive = create_export(
        &app,
        &ws,
        json!({ "name": "Off", "format": "csv", "delivery_method": "feed", "is_active": false }),
    )
    .await;

    let response = app.request("GET", &format!("/feed/{live}.csv"), None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.starts_with("sku"), "{}", response.text);
    let response = app.request("GET", &format!("/feed/{live}"), None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &format!("/feed/{live}.xml"), None, &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.request("GET", &format!("/feed/{download}.csv"), None, &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.request("GET", &format!("/feed/{inactive}.csv"), None, &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app
        .request("GET", &format!("/feed/{}.csv", Uuid::new_v4()), None, &[])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
