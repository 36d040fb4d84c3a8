//! Lenient extraction from model JSON. Missing or mistyped fields fall back
//! to defaults instead of failing the whole response.

use rust_decimal::Decimal;
use serde_json::Value;
use wavelet_core::{clamp_sentiment_score, Sentiment};

use crate::{ContentAnalysis, TopicStat, TrendBriefData};

const DEFAULT_SUMMARY: &str = "No summary available";
const DEFAULT_BRIEF_SUMMARY: &str = "Analysis complete";

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Non-array values become an empty list; non-string entries are skipped.
fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn decimal(value: &Value) -> Option<Decimal> {
    value
        .as_f64()
        .and_then(|f| Decimal::try_from(f).ok())
        .map(|d| d.normalize())
}

pub(crate) fn content_analysis(value: &Value) -> ContentAnalysis {
    let sentiment = value
        .get("sentiment")
        .and_then(Value::as_str)
        .map_or(Sentiment::Neutral, Sentiment::from_label);

    // Zero or missing reads as the neutral midpoint.
    let score = value
        .get("sentimentScore")
        .and_then(decimal)
        .filter(|d| !d.is_zero())
        .unwrap_or(Decimal::new(5, 1));

    ContentAnalysis {
        summary: text(value, "summary").unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        sentiment,
        sentiment_score: clamp_sentiment_score(score),
        topics: string_list(value, "topics"),
        key_insights: string_list(value, "keyInsights"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn topic_stat(value: &Value) -> Option<TopicStat> {
    let name = text(value, "name")?;
    let mentions = value
        .get("mentions")
        .and_then(|m| m.as_i64().or_else(|| m.as_f64().map(|f| f.round() as i64)))?;
    let growth = value
        .get("growth")
        .and_then(decimal)
        .unwrap_or(Decimal::ZERO);
    Some(TopicStat {
        name,
        mentions,
        growth,
    })
}

pub(crate) fn trend_brief(value: &Value) -> TrendBriefData {
    let top_topics = value
        .get("topTopics")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(topic_stat).collect())
        .unwrap_or_default();

    TrendBriefData {
        summary: text(value, "summary").unwrap_or_else(|| DEFAULT_BRIEF_SUMMARY.to_string()),
        key_trends: string_list(value, "keyTrends"),
        opportunities: string_list(value, "opportunities"),
        alerts: string_list(value, "alerts"),
        top_topics,
    }
}
