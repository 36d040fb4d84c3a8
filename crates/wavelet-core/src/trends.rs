//! Trend briefs and trending topics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An AI-written summary of recent activity. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBrief {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub key_trends: Vec<String>,
    pub opportunities: Vec<String>,
    pub alerts: Vec<String>,
    pub posts_analyzed: i64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrendBrief {
    pub title: String,
    pub summary: String,
    pub key_trends: Vec<String>,
    pub opportunities: Vec<String>,
    pub alerts: Vec<String>,
    pub posts_analyzed: i64,
}

/// Latest snapshot for a topic, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: i64,
    pub name: String,
    pub mentions: i64,
    /// Signed growth percentage.
    pub growth: Decimal,
    pub last_updated: DateTime<Utc>,
}
