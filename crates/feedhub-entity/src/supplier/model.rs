//! Supplier entity model.

use chrono::{DateTime, Utc};
use feedhub_feed::FeedFormat;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::fmt;
use uuid::Uuid;

use super::credentials::FeedCredentials;
use super::schedule::SyncSchedule;
use super::status::SupplierStatus;

/// Where a supplier's feed comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Fetched over HTTP(S).
    Url,
    /// Uploaded file kept in storage.
    Upload,
}

impl SourceType {
    /// Return the source type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured external feed source.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    /// Unique supplier identifier.
    pub id: Uuid,
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Display name.
    pub name: String,
    /// URL or upload.
    pub source_type: SourceType,
    /// Feed URL for `url` suppliers.
    pub endpoint_url: Option<String>,
    /// Storage path of the latest upload for `upload` suppliers.
    pub storage_path: Option<String>,
    /// Pinned feed format; detection is used when absent.
    pub feed_type: Option<FeedFormat>,
    /// Endpoint credentials. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub credentials: Json<FeedCredentials>,
    /// Source key holding each item's unique identifier.
    pub unique_key: String,
    /// Scheduled sync frequency.
    pub schedule: SyncSchedule,
    /// Current status.
    pub status: SupplierStatus,
    /// Message of the last failed sync.
    pub last_error: Option<String>,
    /// When the last successful sync finished.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// When the last sync run ended, successful or not.
    pub last_attempted_at: Option<DateTime<Utc>>,
    /// When the supplier was created.
    pub created_at: DateTime<Utc>,
    /// When the supplier was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    /// Name of the configured credential type.
    pub fn credentials_kind(&self) -> &'static str {
        self.credentials.0.kind()
    }

    /// Whether a scheduled sync is due at `now`.
    ///
    /// Measured from the last attempt so a failing feed waits a full
    /// interval before it is fetched again.
    pub fn is_sync_due(&self, now: DateTime<Utc>) -> bool {
        let last_run = self.last_attempted_at.max(self.last_synced_at);
        self.schedule.is_due(last_run, now)
    }

    /// Whether the supplier has something to fetch.
    pub fn has_source(&self) -> bool {
        match self.source_type {
            SourceType::Url => self.endpoint_url.as_deref().is_some_and(|u| !u.is_empty()),
            SourceType::Upload => self.storage_path.as_deref().is_some_and(|p| !p.is_empty()),
        }
    }
}

/// Data required to create a new supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupplier {
    /// Owning workspace.
    pub workspace_id: Uuid,
    /// Display name.
    pub name: String,
    /// URL or upload.
    pub source_type: SourceType,
    /// Feed URL.
    pub endpoint_url: Option<String>,
    /// Pinned feed format.
    pub feed_type: Option<FeedFormat>,
    /// Endpoint credentials.
    pub credentials: FeedCredentials,
    /// Unique identifier source key.
    pub unique_key: String,
    /// Sync schedule.
    pub schedule: SyncSchedule,
}

/// Partial update of a supplier. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSupplier {
    /// New name.
    pub name: Option<String>,
    /// New endpoint URL.
    pub endpoint_url: Option<String>,
    /// New pinned format; `Some(None)` clears the pin.
    pub feed_type: Option<Option<FeedFormat>>,
    /// New credentials.
    pub credentials: Option<FeedCredentials>,
    /// New unique identifier key.
    pub unique_key: Option<String>,
    /// New schedule.
    pub schedule: Option<SyncSchedule>,
    /// New status (only `active`/`paused` are set by users).
    pub status: Option<SupplierStatus>,
}
