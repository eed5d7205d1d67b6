//! Route definitions for the FeedHub HTTP API.
//!
//! Workspace-scoped routes are mounted under `/api`; the public live feed
//! is served from `/feed/{profile}`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(workspace_routes())
        .merge(supplier_routes())
        .merge(field_routes())
        .merge(product_routes())
        .merge(category_routes())
        .merge(export_routes())
        .layer(cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/feed/{name}", get(handlers::feed::live_feed))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
}

/// Workspaces and membership
fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces",
            get(handlers::workspace::list_workspaces).post(handlers::workspace::create_workspace),
        )
        .route(
            "/workspaces/{id}/activate",
            post(handlers::workspace::activate_workspace),
        )
        .route(
            "/workspaces/{id}/members",
            get(handlers::workspace::list_members).post(handlers::workspace::add_member),
        )
}

/// Suppliers, their runs, mappings and raw rows
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/sniff", post(handlers::supplier::sniff_url))
        .route(
            "/suppliers",
            get(handlers::supplier::list_suppliers).post(handlers::supplier::create_supplier),
        )
        .route("/suppliers/sync-all", post(handlers::supplier::sync_all))
        .route(
            "/suppliers/{id}",
            get(handlers::supplier::get_supplier)
                .put(handlers::supplier::update_supplier)
                .patch(handlers::supplier::update_supplier)
                .delete(handlers::supplier::delete_supplier),
        )
        .route("/suppliers/{id}/upload", post(handlers::supplier::upload_feed))
        .route("/suppliers/{id}/sniff", post(handlers::supplier::sniff_supplier))
        .route("/suppliers/{id}/sync", post(handlers::supplier::sync_supplier))
        .route("/suppliers/{id}/map", post(handlers::mapping::run_mapping))
        .route(
            "/suppliers/{id}/ingestions",
            get(handlers::ingestion::list_ingestions),
        )
        .route(
            "/suppliers/{id}/raw-products",
            get(handlers::supplier::list_raw_products),
        )
        .route(
            "/suppliers/{id}/mappings",
            get(handlers::mapping::list_mappings).put(handlers::mapping::replace_mappings),
        )
        .route(
            "/suppliers/{id}/mappings/{mapping_id}",
            axum::routing::delete(handlers::mapping::delete_mapping),
        )
        .route("/ingestions/{id}", get(handlers::ingestion::get_ingestion))
}

/// Custom field schema
fn field_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/fields",
            get(handlers::field::list_fields).post(handlers::field::create_field),
        )
        .route("/fields/order", put(handlers::field::reorder_fields))
        .route(
            "/fields/{id}",
            put(handlers::field::update_field)
                .patch(handlers::field::update_field)
                .delete(handlers::field::delete_field),
        )
}

/// Mapped products
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::product::list_products))
        .route(
            "/products/{id}/category",
            put(handlers::product::assign_category),
        )
}

/// Category tree
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route("/categories/tree", get(handlers::category::category_tree))
        .route(
            "/categories/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .patch(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

/// Export profiles
fn export_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/exports",
            get(handlers::export::list_exports).post(handlers::export::create_export),
        )
        .route(
            "/exports/{id}",
            get(handlers::export::get_export)
                .put(handlers::export::update_export)
                .patch(handlers::export::update_export)
                .delete(handlers::export::delete_export),
        )
        .route(
            "/exports/{id}/download",
            get(handlers::export::download_export),
        )
}
