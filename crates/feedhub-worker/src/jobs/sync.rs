//! Due-supplier sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use feedhub_core::result::AppResult;
use feedhub_database::repositories::SupplierRepository;
use feedhub_entity::supplier::Supplier;
use feedhub_service::IngestionService;
use feedhub_service::ingestion::SyncSummary;

/// Syncs every supplier whose schedule is due.
#[derive(Debug, Clone)]
pub struct ScheduledSyncJob {
    supplier_repo: Arc<SupplierRepository>,
    ingestion: Arc<IngestionService>,
    concurrency: usize,
}

impl ScheduledSyncJob {
    /// Create the sweep job.
    pub fn new(
        supplier_repo: Arc<SupplierRepository>,
        ingestion: Arc<IngestionService>,
        concurrency: usize,
    ) -> Self {
        Self {
            supplier_repo,
            ingestion,
            concurrency,
        }
    }

    /// Run one sweep and return the per-supplier results.
    pub async fn run(&self) -> AppResult<Vec<SyncSummary>> {
        let now = Utc::now();
        let candidates = self.supplier_repo.list_schedule_candidates().await?;
        let due = select_due(candidates, now);
        if due.is_empty() {
            tracing::debug!("No suppliers due for sync");
            return Ok(Vec::new());
        }

        info!(count = due.len(), "Syncing due suppliers");
        let summaries = self.ingestion.sync_many(due, None, self.concurrency).await;

        let failed = summaries.iter().filter(|s| s.error.is_some()).count();
        if failed > 0 {
            warn!(failed, total = summaries.len(), "Scheduled sync finished with failures");
        } else {
            info!(total = summaries.len(), "Scheduled sync finished");
        }
        Ok(summaries)
    }
}

/// Keep the suppliers that have a source and whose schedule is due at `now`.
pub fn select_due(candidates: Vec<Supplier>, now: DateTime<Utc>) -> Vec<Supplier> {
    candidates
        .into_iter()
        .filter(|s| s.has_source() && s.is_sync_due(now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use feedhub_entity::supplier::{FeedCredentials, SourceType, SupplierStatus, SyncSchedule};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn supplier(schedule: SyncSchedule, last: Option<DateTime<Utc>>, url: Option<&str>) -> Supplier {
        let now = Utc::now();
        Supplier {
            id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            source_type: SourceType::Url,
            endpoint_url: url.map(str::to_string),
            storage_path: None,
            feed_type: None,
            credentials: Json(FeedCredentials::default()),
            unique_key: "sku".to_string(),
            schedule,
            status: SupplierStatus::Active,
            last_error: None,
            last_synced_at: last,
            last_attempted_at: last,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_select_due_filters_schedule_and_source() {
        let now = Utc::now();
        let never = supplier(SyncSchedule::Hourly, None, Some("https://a.test/feed.csv"));
        let fresh = supplier(
            SyncSchedule::Daily,
            Some(now - Duration::hours(2)),
            Some("https://b.test/feed.csv"),
        );
        let stale = supplier(
            SyncSchedule::Daily,
            Some(now - Duration::hours(25)),
            Some("https://c.test/feed.csv"),
        );
        let no_url = supplier(SyncSchedule::Hourly, None, None);

        let due = select_due(vec![never.clone(), fresh, stale.clone(), no_url], now);
        let ids: Vec<Uuid> = due.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![never.id, stale.id]);
    }

    #[test]
    fn test_failed_supplier_waits_a_full_interval() {
        let now = Utc::now();
        let mut failing = supplier(
            SyncSchedule::Daily,
            Some(now - Duration::days(3)),
            Some("https://d.test/feed.csv"),
        );
        failing.status = SupplierStatus::Error;
        failing.last_error = Some("HTTP 500".to_string());
        failing.last_attempted_at = Some(now - Duration::minutes(5));
        assert!(select_due(vec![failing.clone()], now).is_empty());

        failing.last_attempted_at = Some(now - Duration::hours(25));
        assert_eq!(select_due(vec![failing], now).len(), 1);
    }
}
