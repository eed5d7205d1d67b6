//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod workspace;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
pub use workspace::{ACTIVE_WORKSPACE_COOKIE, WORKSPACE_HEADER, WorkspaceContext};
