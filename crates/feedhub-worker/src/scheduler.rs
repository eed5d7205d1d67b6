//! Cron scheduler driving the scheduled supplier sweep.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use feedhub_core::config::WorkerConfig;
use feedhub_core::error::AppError;

use crate::jobs::sync::ScheduledSyncJob;

/// Cron-based scheduler for the due-supplier sweep.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Sweep executed on every tick
    job: Arc<ScheduledSyncJob>,
    /// Sweep cadence and concurrency
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("cron", &self.config.cron)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(job: Arc<ScheduledSyncJob>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            job,
            config,
        })
    }

    /// Register the supplier sweep on the configured cron expression.
    ///
    /// Ticks that fire while the previous sweep is still running are
    /// skipped.
    pub async fn register_sync_sweep(&self) -> Result<(), AppError> {
        let job = Arc::clone(&self.job);
        let running = Arc::new(Mutex::new(()));
        let cron = CronJob::new_async(self.config.cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            let running = Arc::clone(&running);
            Box::pin(async move {
                let Ok(_guard) = running.try_lock() else {
                    tracing::debug!("Previous supplier sweep still running, skipping tick");
                    return;
                };
                if let Err(e) = job.run().await {
                    tracing::error!(error = %e, "Scheduled supplier sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid worker cron expression '{}': {e}",
                self.config.cron
            ))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sync schedule: {e}")))?;

        tracing::info!(cron = %self.config.cron, "Registered: supplier sync sweep");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
