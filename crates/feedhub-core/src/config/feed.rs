//! Feed fetching, parsing and mapping limits.

use serde::{Deserialize, Serialize};

/// Limits and behaviour of the ingestion and mapping pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// HTTP timeout for fetching a supplier feed, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    /// Maximum size of a fetched or uploaded feed document.
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: u64,
    /// Number of bytes handed to the key sniffers.
    #[serde(default = "default_sample_bytes")]
    pub sample_bytes: usize,
    /// Maximum number of keys a sniffer returns.
    #[serde(default = "default_sniff_key_limit")]
    pub sniff_key_limit: usize,
    /// Maximum number of recent raw rows re-mapped per mapping run.
    #[serde(default = "default_mapping_row_limit")]
    pub mapping_row_limit: i64,
    /// Raw rows written per bulk insert statement.
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
    /// Suppliers synced concurrently by "sync all".
    #[serde(default = "default_sync_concurrency")]
    pub sync_concurrency: usize,
    /// Run the mapping step automatically after a successful ingestion.
    #[serde(default = "default_true")]
    pub auto_map_after_sync: bool,
    /// Pending/running ingestions older than this are considered abandoned.
    #[serde(default = "default_stale_minutes")]
    pub stale_ingestion_minutes: i64,
    /// User-Agent header sent to supplier endpoints.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: default_fetch_timeout(),
            max_feed_bytes: default_max_feed_bytes(),
            sample_bytes: default_sample_bytes(),
            sniff_key_limit: default_sniff_key_limit(),
            mapping_row_limit: default_mapping_row_limit(),
            insert_batch_size: default_insert_batch_size(),
            sync_concurrency: default_sync_concurrency(),
            auto_map_after_sync: default_true(),
            stale_ingestion_minutes: default_stale_minutes(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    120
}

fn default_max_feed_bytes() -> u64 {
    209_715_200 // 200 MB
}

fn default_sample_bytes() -> usize {
    1024 * 1024
}

fn default_sniff_key_limit() -> usize {
    200
}

fn default_mapping_row_limit() -> i64 {
    2000
}

fn default_insert_batch_size() -> usize {
    500
}

fn default_sync_concurrency() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_stale_minutes() -> i64 {
    60
}

fn default_user_agent() -> String {
    concat!("supplier-feed-hub/", env!("CARGO_PKG_VERSION")).to_string()
}
