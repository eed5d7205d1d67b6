//! # feedhub-api
//!
//! HTTP API layer for FeedHub built on Axum.
//!
//! Provides the workspace-scoped REST endpoints under `/api`, the public
//! live feed endpoint, middleware (CORS, request logging, compression),
//! extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
