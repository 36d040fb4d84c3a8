//! Demo data loaded at startup so a fresh process has something to show.

use rust_decimal::Decimal;
use wavelet_analyzer::{ContentAnalysis, ContentAnalyzer};
use wavelet_core::{NewInfluencer, NewPost, Platform};
use wavelet_store::Store;

use crate::error::MonitorError;

struct SampleInfluencer {
    name: &'static str,
    username: &'static str,
    platform: Platform,
    followers: i64,
    avatar: &'static str,
}

struct SamplePost {
    content: &'static str,
    platform: Platform,
    likes: i64,
    comments: i64,
    shares: i64,
}

const INFLUENCERS: [SampleInfluencer; 4] = [
    SampleInfluencer {
        name: "Ali Abdaal",
        username: "@aliabdaal",
        platform: Platform::Youtube,
        followers: 3_200_000,
        avatar: "AA",
    },
    SampleInfluencer {
        name: "MKBHD",
        username: "@mkbhd",
        platform: Platform::Instagram,
        followers: 17_800_000,
        avatar: "MK",
    },
    SampleInfluencer {
        name: "PUMA",
        username: "@puma",
        platform: Platform::Linkedin,
        followers: 12_400_000,
        avatar: "P",
    },
    SampleInfluencer {
        name: "Mr. Beast",
        username: "@mrbeast",
        platform: Platform::Youtube,
        followers: 178_000_000,
        avatar: "MF",
    },
];

// One post per influencer above, in the same order.
const POSTS: [SamplePost; 4] = [
    SamplePost {
        content: "New video: How I use AI to optimize my productivity workflow. Game-changing tools that save me 10+ hours per week.",
        platform: Platform::Youtube,
        likes: 2300,
        comments: 145,
        shares: 89,
    },
    SamplePost {
        content: "First impressions of the new AI-powered smartphone camera. The computational photography is insane! 📱✨",
        platform: Platform::Instagram,
        likes: 45200,
        comments: 892,
        shares: 234,
    },
    SamplePost {
        content: "Exciting partnership announcement! Collaborating with AI startups to revolutionize athletic performance tracking.",
        platform: Platform::Linkedin,
        likes: 1800,
        comments: 234,
        shares: 156,
    },
    SamplePost {
        content: "Just released the most expensive video ever made. The production value is next level! What do you think?",
        platform: Platform::Youtube,
        likes: 125_000,
        comments: 5670,
        shares: 2340,
    },
];

const TOPICS: [(&str, i64, i64); 5] = [
    ("#AIProductivity", 340, 24),
    ("#TechReviews", 256, 18),
    ("#SmartphoneCamera", 189, 15),
    ("#SportsInnovation", 145, 12),
    ("#ContentCreation", 123, 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub influencers: usize,
    pub posts: usize,
    pub topics: usize,
}

/// Load sample influencers, analyzed posts, and trending topics.
///
/// Does nothing if any active influencer already exists. Sample posts keep
/// the analyzer's own score; a failed analysis falls back to the neutral
/// defaults.
///
/// # Errors
///
/// Returns [`MonitorError::Store`] if any write fails.
pub async fn seed_demo_data(
    store: &dyn Store,
    analyzer: &dyn ContentAnalyzer,
) -> Result<SeedReport, MonitorError> {
    if !store.list_influencers().await?.is_empty() {
        tracing::info!("seed: store already populated; skipping demo data");
        return Ok(SeedReport {
            influencers: 0,
            posts: 0,
            topics: 0,
        });
    }

    let mut created = Vec::with_capacity(INFLUENCERS.len());
    for sample in &INFLUENCERS {
        let mut new = NewInfluencer::new(sample.name, sample.username, sample.platform);
        new.followers = sample.followers;
        new.avatar = Some(sample.avatar.to_string());
        created.push(store.create_influencer(new).await?);
    }

    for (influencer, sample) in created.iter().zip(&POSTS) {
        let analysis = match analyzer.analyze(sample.content, sample.platform).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "seed: analysis failed, using defaults");
                ContentAnalysis::unavailable()
            }
        };

        let mut post = NewPost::new(influencer.id, sample.content, sample.platform);
        post.likes = sample.likes;
        post.comments = sample.comments;
        post.shares = sample.shares;
        post.sentiment = Some(analysis.sentiment);
        post.sentiment_score = Some(analysis.sentiment_score);
        post.topics = Some(analysis.topics);
        post.ai_summary = Some(analysis.summary);
        store.create_post(post).await?;
    }

    for (name, mentions, growth) in TOPICS {
        store
            .upsert_trending_topic(name, mentions, Decimal::from(growth))
            .await?;
    }

    let report = SeedReport {
        influencers: created.len(),
        posts: POSTS.len(),
        topics: TOPICS.len(),
    };
    tracing::info!(?report, "seed: demo data initialized");
    Ok(report)
}
