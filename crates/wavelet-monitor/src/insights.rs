//! Dashboard aggregates derived from stored posts and topics.

use serde::Serialize;
use wavelet_core::{Post, Sentiment, TrendingTopic};
use wavelet_store::Store;

use crate::error::MonitorError;

/// Posts considered for the engagement score.
pub const METRICS_POST_WINDOW: usize = 100;
/// Posts considered for the sentiment share in insights.
pub const INSIGHTS_POST_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub tracked_influencers: usize,
    pub posts_analyzed: usize,
    pub trending_topics: usize,
    pub engagement_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub key_trend: String,
    pub opportunity: String,
    pub alert: String,
}

/// Average likes + comments per post, per thousand, capped at 100.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn engagement_score(posts: &[Post]) -> i64 {
    if posts.is_empty() {
        return 0;
    }
    let total: i64 = posts.iter().map(|p| p.likes + p.comments).sum();
    let average = total as f64 / posts.len() as f64;
    let score = (average / 1000.0 * 100.0).round() as i64;
    score.min(100)
}

/// Share of positive posts as a whole percentage; 0 when there are none.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn positive_percentage(posts: &[Post]) -> i64 {
    if posts.is_empty() {
        return 0;
    }
    let positive = posts
        .iter()
        .filter(|p| p.sentiment == Some(Sentiment::Positive))
        .count();
    (positive as f64 / posts.len() as f64 * 100.0).round() as i64
}

#[must_use]
pub fn build_insights(posts: &[Post], topics: &[TrendingTopic]) -> AiInsights {
    let total_mentions: i64 = topics.iter().map(|t| t.mentions).sum();
    AiInsights {
        key_trend: format!(
            "AI productivity tools are gaining massive traction among content creators, with {}% positive sentiment.",
            positive_percentage(posts)
        ),
        opportunity: "Smartphone camera technology discussions present partnership opportunities with tech influencers.".to_string(),
        alert: format!("Tracked {total_mentions} total topic mentions across all platforms this week."),
    }
}

/// # Errors
///
/// Returns [`MonitorError::Store`] if any table cannot be read.
pub async fn dashboard_metrics(store: &dyn Store) -> Result<DashboardMetrics, MonitorError> {
    let influencers = store.list_influencers().await?;
    let posts_analyzed = store.count_posts().await?;
    let topics = store.list_trending_topics().await?;
    let recent = store.list_posts(METRICS_POST_WINDOW).await?;

    Ok(DashboardMetrics {
        tracked_influencers: influencers.len(),
        posts_analyzed,
        trending_topics: topics.len(),
        engagement_score: engagement_score(&recent),
    })
}

/// # Errors
///
/// Returns [`MonitorError::Store`] if posts or topics cannot be read.
pub async fn ai_insights(store: &dyn Store) -> Result<AiInsights, MonitorError> {
    let posts = store.list_posts(INSIGHTS_POST_WINDOW).await?;
    let topics = store.list_trending_topics().await?;
    Ok(build_insights(&posts, &topics))
}
