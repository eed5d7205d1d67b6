//! Ingestion status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a feed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ingestion_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IngestionStatus {
    /// Row created, work not started.
    Pending,
    /// Fetching and parsing.
    Running,
    /// Finished; counts are final.
    Completed,
    /// Aborted; `error_message` explains why.
    Failed,
}

impl IngestionStatus {
    /// Check if the run is finalized (and therefore immutable).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for IngestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!IngestionStatus::Pending.is_terminal());
        assert!(!IngestionStatus::Running.is_terminal());
        assert!(IngestionStatus::Completed.is_terminal());
        assert!(IngestionStatus::Failed.is_terminal());
    }
}
