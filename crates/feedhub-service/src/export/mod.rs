//! Export profiles and document generation.

pub mod service;

pub use service::{CreateExportRequest, ExportService, GeneratedExport};
