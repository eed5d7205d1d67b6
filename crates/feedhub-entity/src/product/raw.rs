//! Raw product rows as ingested from supplier feeds.

use chrono::{DateTime, Utc};
use feedhub_feed::FieldMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A supplier item exactly as parsed, keyed by external id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RawProduct {
    /// Unique row identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Source supplier.
    pub supplier_id: Uuid,
    /// Value of the supplier's unique-identifier field.
    pub external_id: String,
    /// Free-form field map.
    pub data: Json<FieldMap>,
    /// Run that last wrote this row.
    pub ingestion_id: Option<Uuid>,
    /// When the row was first ingested.
    pub created_at: DateTime<Utc>,
    /// When the row was last rewritten.
    pub updated_at: DateTime<Utc>,
}

/// A parsed item ready to be upserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRawProduct {
    /// External id.
    pub external_id: String,
    /// Field map.
    pub data: FieldMap,
}
