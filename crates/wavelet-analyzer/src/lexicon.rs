//! Offline analyzer backed by a word-weight lexicon.
//!
//! Used when no OpenAI key is configured. Never fails.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use wavelet_core::{Influencer, Platform, Post, Sentiment};

use crate::error::AnalysisError;
use crate::{ContentAnalysis, ContentAnalyzer, TopicStat, TrendBriefData};

/// Word weights for creator and brand content.
///
/// Keys are lowercase single words. Positive weights in `(0.0, 1.0]`,
/// negative in `[-1.0, 0.0)`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("best", 0.5),
    ("exciting", 0.4),
    ("excellent", 0.5),
    ("game-changing", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("incredible", 0.5),
    ("insane", 0.3),
    ("love", 0.5),
    ("loved", 0.5),
    ("partnership", 0.3),
    ("recommend", 0.4),
    ("revolutionize", 0.4),
    ("save", 0.2),
    ("ultimate", 0.3),
    ("win", 0.4),
    // Negative signals
    ("awful", -0.6),
    ("bad", -0.4),
    ("broken", -0.5),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("fail", -0.4),
    ("failed", -0.4),
    ("hate", -0.6),
    ("problem", -0.3),
    ("scam", -0.7),
    ("terrible", -0.6),
    ("worst", -0.6),
    ("waste", -0.5),
];

/// Raw lexicon score in `[-1.0, 1.0]`; `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = LEXICON.iter().find(|(lex, _)| *lex == w) {
            score += weight;
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Scores strictly beyond this band are classified positive or negative.
const NEUTRAL_BAND: f32 = 0.1;

fn classify(score: f32) -> Sentiment {
    if score > NEUTRAL_BAND {
        Sentiment::Positive
    } else if score < -NEUTRAL_BAND {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Map `[-1, 1]` onto `[0, 1]`, two decimal places.
fn unit_score(score: f32) -> Decimal {
    let unit = (f64::from(score) + 1.0) / 2.0;
    Decimal::try_from(unit)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::new(5, 1))
}

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z][A-Za-z0-9_]*)").expect("valid regex"));

fn hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for cap in HASHTAG.captures_iter(text) {
        let tag = format!("#{}", &cap[1]);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn first_sentence(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let end = trimmed
        .find(['.', '!', '?', '\n'])
        .map_or(trimmed.len(), |i| i + 1);
    let sentence: String = trimmed[..end].trim().chars().take(200).collect();
    Some(sentence)
}

fn matched_words(text: &str, positive: bool) -> Vec<&'static str> {
    let mut found = Vec::new();
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex, weight) in LEXICON {
            if lex == w && (weight > 0.0) == positive && !found.contains(&lex) {
                found.push(lex);
            }
        }
    }
    found
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn analyze_text(text: &str) -> ContentAnalysis {
        let score = lexicon_score(text);
        let sentiment = classify(score);

        let mut key_insights = Vec::new();
        let positives = matched_words(text, true);
        if !positives.is_empty() {
            key_insights.push(format!("Positive signals: {}", positives.join(", ")));
        }
        let negatives = matched_words(text, false);
        if !negatives.is_empty() {
            key_insights.push(format!("Negative signals: {}", negatives.join(", ")));
        }

        ContentAnalysis {
            summary: first_sentence(text).unwrap_or_else(|| "No summary available".to_string()),
            sentiment,
            sentiment_score: unit_score(score),
            topics: hashtags(text),
            key_insights,
        }
    }
}

#[async_trait]
impl ContentAnalyzer for LexiconAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        _platform: Platform,
    ) -> Result<ContentAnalysis, AnalysisError> {
        Ok(Self::analyze_text(text))
    }

    async fn generate_brief(
        &self,
        posts: &[Post],
        influencers: &[Influencer],
    ) -> Result<TrendBriefData, AnalysisError> {
        Ok(summarize_batch(posts, influencers))
    }
}

/// Percentage of `part` in `whole`, rounded to one decimal place.
fn share(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp(1)
        .normalize()
}

fn summarize_batch(posts: &[Post], influencers: &[Influencer]) -> TrendBriefData {
    let total = posts.len();
    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut topic_counts: HashMap<String, usize> = HashMap::new();
    let mut positive_topics: HashMap<String, usize> = HashMap::new();

    for post in posts {
        let sentiment = post
            .sentiment
            .unwrap_or_else(|| classify(lexicon_score(&post.content)));
        match sentiment {
            Sentiment::Positive => positive += 1,
            Sentiment::Negative => negative += 1,
            Sentiment::Neutral => {}
        }
        let topics = post
            .topics
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| hashtags(&post.content));
        for topic in topics {
            if sentiment == Sentiment::Positive {
                *positive_topics.entry(topic.clone()).or_default() += 1;
            }
            *topic_counts.entry(topic).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = topic_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let summary = format!(
        "Analyzed {total} posts from {} influencers: {}% positive, {}% negative.",
        influencers.len(),
        share(positive, total),
        share(negative, total),
    );

    let key_trends = ranked
        .iter()
        .take(3)
        .map(|(name, count)| format!("{name} mentioned in {count} posts"))
        .collect();

    let mut best_positive: Vec<(String, usize)> = positive_topics.into_iter().collect();
    best_positive.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let opportunities = best_positive
        .first()
        .map(|(name, _)| {
            vec![format!(
                "Positive conversation around {name} suggests partnership potential"
            )]
        })
        .unwrap_or_default();

    let alerts = if negative > 0 {
        vec![format!("{negative} of {total} posts carry negative sentiment")]
    } else {
        Vec::new()
    };

    let top_topics = ranked
        .into_iter()
        .take(5)
        .map(|(name, count)| TopicStat {
            growth: share(count, total),
            mentions: i64::try_from(count).unwrap_or(i64::MAX),
            name,
        })
        .collect();

    TrendBriefData {
        summary,
        key_trends,
        opportunities,
        alerts,
        top_topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(content: &str, sentiment: Option<Sentiment>, topics: Option<Vec<&str>>) -> Post {
        Post {
            id: 1,
            influencer_id: 1,
            content: content.to_string(),
            platform: Platform::Youtube,
            likes: 0,
            comments: 0,
            shares: 0,
            views: None,
            external_id: None,
            url: None,
            published_at: None,
            sentiment,
            sentiment_score: None,
            topics: topics.map(|t| t.into_iter().map(str::to_string).collect()),
            ai_summary: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_text_is_neutral_midpoint() {
        let a = LexiconAnalyzer::analyze_text("");
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert_eq!(a.sentiment_score, Decimal::new(5, 1));
        assert_eq!(a.summary, "No summary available");
    }

    #[test]
    fn positive_words_classify_positive() {
        let a = LexiconAnalyzer::analyze_text("This camera is amazing! I love it.");
        assert_eq!(a.sentiment, Sentiment::Positive);
        assert!(a.sentiment_score > Decimal::new(5, 1));
        assert_eq!(a.summary, "This camera is amazing!");
        assert_eq!(a.key_insights, vec!["Positive signals: amazing, love"]);
    }

    #[test]
    fn negative_words_classify_negative() {
        let a = LexiconAnalyzer::analyze_text("Worst update ever, totally broken");
        assert_eq!(a.sentiment, Sentiment::Negative);
        assert!(a.sentiment_score < Decimal::new(5, 1));
    }

    #[test]
    fn score_saturates_at_one() {
        let a = LexiconAnalyzer::analyze_text("amazing awesome best excellent incredible love");
        assert_eq!(a.sentiment_score, Decimal::ONE);
    }

    #[test]
    fn hashtags_become_topics_once() {
        let a = LexiconAnalyzer::analyze_text("New setup #AIProductivity #Tech #AIProductivity");
        assert_eq!(a.topics, vec!["#AIProductivity", "#Tech"]);
    }

    #[test]
    fn batch_counts_sentiment_and_topics() {
        let posts = vec![
            post("a", Some(Sentiment::Positive), Some(vec!["#AI"])),
            post("b", Some(Sentiment::Positive), Some(vec!["#AI", "#Phones"])),
            post("c", Some(Sentiment::Negative), Some(vec!["#Phones"])),
            post("d #Sports", None, None),
        ];
        let brief = summarize_batch(&posts, &[]);

        assert_eq!(
            brief.summary,
            "Analyzed 4 posts from 0 influencers: 50% positive, 25% negative."
        );
        assert_eq!(brief.top_topics[0].name, "#AI");
        assert_eq!(brief.top_topics[0].mentions, 2);
        assert_eq!(brief.top_topics[0].growth, Decimal::from(50));
        assert_eq!(
            brief.opportunities,
            vec!["Positive conversation around #AI suggests partnership potential"]
        );
        assert_eq!(brief.alerts, vec!["1 of 4 posts carry negative sentiment"]);
        assert!(brief.top_topics.iter().any(|t| t.name == "#Sports"));
    }

    #[test]
    fn empty_batch_has_no_topics() {
        let brief = summarize_batch(&[], &[]);
        assert!(brief.top_topics.is_empty());
        assert!(brief.alerts.is_empty());
        assert!(brief.summary.starts_with("Analyzed 0 posts"));
    }
}
