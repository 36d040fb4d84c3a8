//! Per-influencer polling timers.
//!
//! Each monitored influencer owns exactly one repeated job on a shared
//! [`JobScheduler`]. The timer table maps influencer id to job id and is
//! only touched through [`MonitoringService::install_timer`] and
//! [`MonitoringService::cancel_timer`], both under one lock, so a second
//! `start_monitoring` for the same id always replaces the first job.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::error::MonitorError;
use crate::pipeline::{CheckOutcome, ContentPipeline};

/// Default polling interval applied by [`MonitoringService::start_monitoring_all`].
pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;

pub struct MonitoringService {
    scheduler: JobScheduler,
    timers: Mutex<HashMap<i64, Uuid>>,
    pipeline: Arc<ContentPipeline>,
    default_interval_minutes: u64,
}

impl MonitoringService {
    /// Builds and starts the underlying job scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Scheduler`] if the scheduler cannot be
    /// initialised or started.
    pub async fn new(
        pipeline: Arc<ContentPipeline>,
        default_interval_minutes: u64,
    ) -> Result<Self, MonitorError> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;
        Ok(Self {
            scheduler,
            timers: Mutex::new(HashMap::new()),
            pipeline,
            default_interval_minutes,
        })
    }

    #[must_use]
    pub fn pipeline(&self) -> &Arc<ContentPipeline> {
        &self.pipeline
    }

    /// (Re)start polling `influencer_id` every `interval_minutes`. Any
    /// existing timer for the id is cancelled first. The first check runs
    /// after one full interval.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidInterval`] for a zero interval, or
    /// [`MonitorError::Scheduler`] if the job cannot be registered.
    pub async fn start_monitoring(
        &self,
        influencer_id: i64,
        interval_minutes: u64,
    ) -> Result<(), MonitorError> {
        self.start_monitoring_every(
            influencer_id,
            Duration::from_secs(interval_minutes.saturating_mul(60)),
        )
        .await?;
        tracing::info!(
            influencer_id,
            interval_minutes,
            "monitor: started monitoring influencer"
        );
        Ok(())
    }

    /// [`start_monitoring`](Self::start_monitoring) with an arbitrary period.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidInterval`] for periods under one
    /// second, or [`MonitorError::Scheduler`] if the job cannot be
    /// registered.
    pub async fn start_monitoring_every(
        &self,
        influencer_id: i64,
        every: Duration,
    ) -> Result<(), MonitorError> {
        if every < Duration::from_secs(1) {
            return Err(MonitorError::InvalidInterval);
        }

        let mut timers = self.timers.lock().await;
        self.cancel_timer(&mut timers, influencer_id).await?;
        self.install_timer(&mut timers, influencer_id, every).await
    }

    /// Cancel the timer for `influencer_id`. No-op when none is registered.
    /// An in-flight check is allowed to finish.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Scheduler`] if the job cannot be removed.
    pub async fn stop_monitoring(&self, influencer_id: i64) -> Result<(), MonitorError> {
        let mut timers = self.timers.lock().await;
        if self.cancel_timer(&mut timers, influencer_id).await? {
            tracing::info!(influencer_id, "monitor: stopped monitoring influencer");
        }
        Ok(())
    }

    /// Start the default-interval timer for every active influencer.
    /// Returns how many timers were registered.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Store`] if influencers cannot be listed, or
    /// [`MonitorError::Scheduler`] if a job cannot be registered.
    pub async fn start_monitoring_all(&self) -> Result<usize, MonitorError> {
        let influencers = self.pipeline.store().list_influencers().await?;
        let active: Vec<i64> = influencers
            .iter()
            .filter(|i| i.is_active)
            .map(|i| i.id)
            .collect();

        tracing::info!(
            count = active.len(),
            "monitor: starting monitoring for active influencers"
        );

        for id in &active {
            self.start_monitoring(*id, self.default_interval_minutes)
                .await?;
        }
        Ok(active.len())
    }

    /// Cancel every timer and clear the table.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Scheduler`] on the first job that cannot be
    /// removed; timers already cancelled stay cancelled.
    pub async fn stop_monitoring_all(&self) -> Result<(), MonitorError> {
        let mut timers = self.timers.lock().await;
        let ids: Vec<i64> = timers.keys().copied().collect();
        for id in ids {
            self.cancel_timer(&mut timers, id).await?;
        }
        tracing::info!("monitor: stopped monitoring all influencers");
        Ok(())
    }

    /// Run a check immediately, outside the timer schedule.
    pub async fn check_for_new_content(&self, influencer_id: i64) -> CheckOutcome {
        self.pipeline.check_for_new_content(influencer_id).await
    }

    /// Influencer ids with an active timer, ascending.
    pub async fn monitored_ids(&self) -> Vec<i64> {
        let timers = self.timers.lock().await;
        let mut ids: Vec<i64> = timers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Scheduler job currently polling `influencer_id`.
    pub async fn timer_id(&self, influencer_id: i64) -> Option<Uuid> {
        self.timers.lock().await.get(&influencer_id).copied()
    }

    /// Cancel all timers and stop the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Scheduler`] if jobs cannot be removed or the
    /// scheduler fails to shut down.
    pub async fn shutdown(&self) -> Result<(), MonitorError> {
        self.stop_monitoring_all().await?;
        let mut scheduler = self.scheduler.clone();
        scheduler.shutdown().await?;
        Ok(())
    }

    async fn cancel_timer(
        &self,
        timers: &mut HashMap<i64, Uuid>,
        influencer_id: i64,
    ) -> Result<bool, MonitorError> {
        match timers.remove(&influencer_id) {
            Some(job_id) => {
                self.scheduler.remove(&job_id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn install_timer(
        &self,
        timers: &mut HashMap<i64, Uuid>,
        influencer_id: i64,
        every: Duration,
    ) -> Result<(), MonitorError> {
        let pipeline = Arc::clone(&self.pipeline);
        let job = Job::new_repeated_async(every, move |_uuid, _lock| {
            let pipeline = Arc::clone(&pipeline);
            Box::pin(async move {
                let outcome = pipeline.check_for_new_content(influencer_id).await;
                tracing::debug!(influencer_id, ?outcome, "scheduler: monitoring tick complete");
            })
        })?;

        let job_id = self.scheduler.add(job).await?;
        timers.insert(influencer_id, job_id);
        Ok(())
    }
}
