//! On-demand trend brief generation.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use wavelet_analyzer::{ContentAnalyzer, TrendBriefData};
use wavelet_core::{NewTrendBrief, TrendBrief};
use wavelet_store::Store;

use crate::error::MonitorError;

/// Posts fed into each brief.
pub const BRIEF_POST_LIMIT: usize = 100;

pub struct TrendBriefGenerator {
    store: Arc<dyn Store>,
    analyzer: Arc<dyn ContentAnalyzer>,
}

impl TrendBriefGenerator {
    pub fn new(store: Arc<dyn Store>, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        Self { store, analyzer }
    }

    /// Summarize recent posts, persist the brief, and upsert every topic the
    /// analyzer reported. Analyzer failure yields the canned fallback brief.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Store`] if posts cannot be read or the brief
    /// cannot be written.
    pub async fn generate(&self) -> Result<TrendBrief, MonitorError> {
        let posts = self.store.list_posts(BRIEF_POST_LIMIT).await?;
        let influencers = self.store.list_influencers().await?;

        let data = match self.analyzer.generate_brief(&posts, &influencers).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "brief: generation failed, using fallback");
                TrendBriefData::fallback(posts.len())
            }
        };

        let brief = self
            .store
            .create_trend_brief(NewTrendBrief {
                title: brief_title(Utc::now()),
                summary: data.summary,
                key_trends: data.key_trends,
                opportunities: data.opportunities,
                alerts: data.alerts,
                posts_analyzed: i64::try_from(posts.len()).unwrap_or(i64::MAX),
            })
            .await?;

        for topic in &data.top_topics {
            self.store
                .upsert_trending_topic(&topic.name, topic.mentions, topic.growth)
                .await?;
        }

        tracing::info!(
            brief_id = brief.id,
            posts_analyzed = brief.posts_analyzed,
            topics = data.top_topics.len(),
            "brief: generated trend brief"
        );
        Ok(brief)
    }
}

/// `Trend Brief - M/D/YYYY`, no zero padding.
#[must_use]
pub fn brief_title(at: DateTime<Utc>) -> String {
    format!("Trend Brief - {}/{}/{}", at.month(), at.day(), at.year())
}
