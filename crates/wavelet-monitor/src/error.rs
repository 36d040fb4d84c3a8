use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;
use wavelet_store::StoreError;
use wavelet_youtube::YoutubeError;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("content source error: {0}")]
    Source(#[from] YoutubeError),

    #[error("monitoring interval must be at least one second")]
    InvalidInterval,
}
