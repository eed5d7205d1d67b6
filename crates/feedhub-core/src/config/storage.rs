//! Uploaded feed storage configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration for supplier feed uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for local file storage.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Bucket (top-level directory) holding uploaded supplier feeds.
    #[serde(default = "default_feeds_bucket")]
    pub feeds_bucket: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            feeds_bucket: default_feeds_bucket(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_feeds_bucket() -> String {
    "supplier-feeds".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
