//! Scheduled sync worker configuration.

use serde::{Deserialize, Serialize};

/// Background scheduled-sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the due-supplier sweep.
    #[serde(default = "default_cron")]
    pub cron: String,
    /// Maximum number of suppliers synced concurrently per sweep.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            cron: default_cron(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cron() -> String {
    "0 */5 * * * *".to_string()
}

fn default_concurrency() -> usize {
    4
}
