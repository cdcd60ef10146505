//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use audithub_auth::session::TokenSweeper;
use audithub_core::config::session::SessionConfig;
use audithub_core::error::AppError;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Stale session sweeper.
    sweeper: Arc<TokenSweeper>,
    /// Minutes between sweep cycles.
    sweep_interval_minutes: u64,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("sweep_interval_minutes", &self.sweep_interval_minutes)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(sweeper: Arc<TokenSweeper>, config: &SessionConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sweeper,
            sweep_interval_minutes: config.sweep_interval_minutes,
        })
    }

    /// Register all scheduled tasks.
    pub async fn register_tasks(&self) -> Result<(), AppError> {
        self.register_stale_session_sweep().await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Stale session sweep, on the configured interval.
    ///
    /// A failed cycle is logged and the next cycle runs as scheduled;
    /// sweeping is idempotent so missed work is picked up then.
    async fn register_stale_session_sweep(&self) -> Result<(), AppError> {
        let schedule = format!("0 */{} * * * *", self.sweep_interval_minutes);
        let sweeper = Arc::clone(&self.sweeper);

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            Box::pin(async move {
                match sweeper.run_sweep().await {
                    Ok(revoked) if revoked > 0 => {
                        info!(revoked = revoked, "Stale session sweep cycle completed");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "Stale session sweep cycle failed");
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {e}")))?;

        info!(
            interval_minutes = self.sweep_interval_minutes,
            "Registered: stale_session_sweep"
        );
        Ok(())
    }
}
