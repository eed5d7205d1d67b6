//! Feed ingestion entity model.

use chrono::{DateTime, Utc};
use feedhub_feed::FeedFormat;
use feedhub_feed::parse::ItemError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::status::IngestionStatus;

/// One execution of fetching and parsing a supplier feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedIngestion {
    /// Unique run identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Supplier being synced.
    pub supplier_id: Uuid,
    /// Lifecycle state.
    pub status: IngestionStatus,
    /// Detected or pinned feed format.
    pub feed_type: Option<FeedFormat>,
    /// Items encountered.
    pub items_total: i32,
    /// Items stored as raw products.
    pub items_ok: i32,
    /// Items rejected.
    pub items_error: i32,
    /// Sample of rejected items.
    pub error_samples: Json<Vec<ItemError>>,
    /// Failure reason for failed runs.
    pub error_message: Option<String>,
    /// User who triggered the run; `None` for scheduled runs.
    pub triggered_by: Option<Uuid>,
    /// When the run started working.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run was finalized.
    pub finished_at: Option<DateTime<Utc>>,
    /// Wall time between start and finish.
    pub duration_ms: Option<i64>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
}

/// Final counts written when a run completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionCompletion {
    /// Detected format.
    pub feed_type: Option<FeedFormat>,
    /// Items encountered.
    pub items_total: i32,
    /// Items stored.
    pub items_ok: i32,
    /// Items rejected.
    pub items_error: i32,
    /// Rejected item sample.
    pub error_samples: Vec<ItemError>,
}

impl IngestionCompletion {
    /// Build completion counts, saturating at `i32::MAX`.
    pub fn new(
        feed_type: FeedFormat,
        total: usize,
        ok: usize,
        errors: usize,
        error_samples: Vec<ItemError>,
    ) -> Self {
        let clamp = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            feed_type: Some(feed_type),
            items_total: clamp(total),
            items_ok: clamp(ok),
            items_error: clamp(errors),
            error_samples,
        }
    }
}
