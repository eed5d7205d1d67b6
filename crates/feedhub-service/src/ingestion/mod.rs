//! Feed ingestion runs.

pub mod service;

pub use service::{IngestionService, SyncOutcome, SyncSummary};
