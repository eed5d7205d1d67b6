//! Workspace (tenant) management.

pub mod service;

pub use service::WorkspaceService;
