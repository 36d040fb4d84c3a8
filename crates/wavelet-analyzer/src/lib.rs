//! Content analysis for wavelet.
//!
//! A [`ContentAnalyzer`] turns raw post text into sentiment, topics, and a
//! short summary, and condenses a batch of posts into trend brief data.
//! Failures are returned as [`AnalysisError`]; callers that must never fail
//! map the error arm to [`ContentAnalysis::unavailable`] or
//! [`TrendBriefData::fallback`].

pub mod error;
pub mod lexicon;
pub mod openai;
mod sanitize;

pub use error::AnalysisError;
pub use lexicon::LexiconAnalyzer;
pub use openai::OpenAiAnalyzer;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wavelet_core::{Influencer, Platform, Post, Sentiment};

/// Summary placed on posts whose analysis failed.
pub const UNAVAILABLE_SUMMARY: &str = "Content analysis unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub summary: String,
    pub sentiment: Sentiment,
    /// Always within `[0, 1]`.
    pub sentiment_score: Decimal,
    pub topics: Vec<String>,
    pub key_insights: Vec<String>,
}

impl ContentAnalysis {
    /// Neutral result used when the backend could not be reached.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            summary: UNAVAILABLE_SUMMARY.to_string(),
            sentiment: Sentiment::Neutral,
            sentiment_score: Sentiment::Neutral.heuristic_score(),
            topics: Vec::new(),
            key_insights: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStat {
    pub name: String,
    pub mentions: i64,
    pub growth: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBriefData {
    pub summary: String,
    pub key_trends: Vec<String>,
    pub opportunities: Vec<String>,
    pub alerts: Vec<String>,
    pub top_topics: Vec<TopicStat>,
}

impl TrendBriefData {
    /// Canned brief used when batch analysis fails.
    #[must_use]
    pub fn fallback(post_count: usize) -> Self {
        Self {
            summary: format!("Trend analysis completed with {post_count} posts analyzed"),
            key_trends: vec![
                "AI and productivity tools trending".to_string(),
                "Tech reviews gaining momentum".to_string(),
            ],
            opportunities: vec!["Partnership opportunities with tech influencers".to_string()],
            alerts: vec!["Competitor activity increasing".to_string()],
            top_topics: Vec::new(),
        }
    }
}

#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Analyze a single post.
    async fn analyze(
        &self,
        text: &str,
        platform: Platform,
    ) -> Result<ContentAnalysis, AnalysisError>;

    /// Summarize a batch of posts into trend brief data.
    async fn generate_brief(
        &self,
        posts: &[Post],
        influencers: &[Influencer],
    ) -> Result<TrendBriefData, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_neutral_and_empty() {
        let a = ContentAnalysis::unavailable();
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert_eq!(a.sentiment_score, Decimal::new(5, 1));
        assert!(a.topics.is_empty());
        assert!(a.key_insights.is_empty());
        assert_eq!(a.summary, "Content analysis unavailable");
    }

    #[test]
    fn fallback_brief_mentions_post_count() {
        let brief = TrendBriefData::fallback(7);
        assert_eq!(brief.summary, "Trend analysis completed with 7 posts analyzed");
        assert_eq!(brief.key_trends.len(), 2);
        assert_eq!(brief.opportunities.len(), 1);
        assert_eq!(brief.alerts, vec!["Competitor activity increasing"]);
        assert!(brief.top_topics.is_empty());
    }
}
