//! Influencer monitoring for wavelet.
//!
//! [`MonitoringService`] keeps one polling timer per active influencer. Each
//! tick runs the [`ContentPipeline`]: fetch recent videos, drop those already
//! stored, analyze the rest, and persist them. [`TrendBriefGenerator`] runs
//! on demand over the same store and analyzer.

pub mod brief;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod seed;
pub mod service;

pub use brief::{brief_title, TrendBriefGenerator};
pub use error::MonitorError;
pub use insights::{ai_insights, dashboard_metrics, AiInsights, DashboardMetrics};
pub use pipeline::{video_to_post, CheckOutcome, ContentPipeline, DEFAULT_MAX_RESULTS};
pub use seed::{seed_demo_data, SeedReport};
pub use service::{MonitoringService, DEFAULT_INTERVAL_MINUTES};
