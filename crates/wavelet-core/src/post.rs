//! Analyzed posts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CoreError, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Lenient parse for model output: anything unrecognised is neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.trim().to_ascii_lowercase().parse().unwrap_or(Sentiment::Neutral)
    }

    /// Fixed score derived from the category alone (0.8 / 0.2 / 0.5).
    ///
    /// Distinct from the analyzer's own score; the monitoring pipeline
    /// stores this value on every post it creates.
    #[must_use]
    pub fn heuristic_score(self) -> Decimal {
        match self {
            Sentiment::Positive => Decimal::new(8, 1),
            Sentiment::Negative => Decimal::new(2, 1),
            Sentiment::Neutral => Decimal::new(5, 1),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(CoreError::UnknownSentiment(other.to_string())),
        }
    }
}

/// Clamp a sentiment score into `[0, 1]`.
#[must_use]
pub fn clamp_sentiment_score(score: Decimal) -> Decimal {
    score.clamp(Decimal::ZERO, Decimal::ONE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    /// Not enforced: the influencer may have been deleted since.
    pub influencer_id: i64,
    pub content: String,
    pub platform: Platform,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: Option<i64>,
    pub external_id: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: Option<Decimal>,
    pub topics: Option<Vec<String>>,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// First non-empty line of the content; for videos this is the title.
    ///
    /// Used to recognise already-stored items. Two items with the same
    /// title collide.
    #[must_use]
    pub fn dedup_key(&self) -> Option<&str> {
        self.content.lines().next().filter(|line| !line.is_empty())
    }
}

/// Fields accepted when creating a post. Counters default to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub influencer_id: i64,
    pub content: String,
    pub platform: Platform,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: Option<i64>,
    pub external_id: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub sentiment: Option<Sentiment>,
    pub sentiment_score: Option<Decimal>,
    pub topics: Option<Vec<String>>,
    pub ai_summary: Option<String>,
}

impl NewPost {
    #[must_use]
    pub fn new(influencer_id: i64, content: impl Into<String>, platform: Platform) -> Self {
        Self {
            influencer_id,
            content: content.into(),
            platform,
            likes: 0,
            comments: 0,
            shares: 0,
            views: None,
            external_id: None,
            url: None,
            published_at: None,
            sentiment: None,
            sentiment_score: None,
            topics: None,
            ai_summary: None,
        }
    }
}
