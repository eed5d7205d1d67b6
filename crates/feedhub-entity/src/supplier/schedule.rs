//! Supplier sync schedules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a supplier is synced by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sync_schedule", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncSchedule {
    /// Only synced on request.
    #[default]
    Manual,
    /// Every hour.
    Hourly,
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
}

impl SyncSchedule {
    /// Interval between scheduled syncs, `None` for manual.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Self::Manual => None,
            Self::Hourly => Some(Duration::hours(1)),
            Self::Daily => Some(Duration::days(1)),
            Self::Weekly => Some(Duration::weeks(1)),
        }
    }

    /// Whether a sync is due at `now` given the last successful sync.
    pub fn is_due(&self, last_synced_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self.interval(), last_synced_at) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(interval), Some(last)) => now - last >= interval,
        }
    }

    /// Return the schedule as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for SyncSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        assert!(!SyncSchedule::Manual.is_due(None, now));
        assert!(SyncSchedule::Hourly.is_due(None, now));
        assert!(SyncSchedule::Hourly.is_due(Some(now - Duration::minutes(61)), now));
        assert!(!SyncSchedule::Daily.is_due(Some(now - Duration::hours(23)), now));
        assert!(SyncSchedule::Weekly.is_due(Some(now - Duration::days(7)), now));
    }
}
