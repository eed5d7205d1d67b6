//! Feed ingestion run entities.

pub mod model;
pub mod status;

pub use model::{FeedIngestion, IngestionCompletion};
pub use status::IngestionStatus;
