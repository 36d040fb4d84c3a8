//! Shared domain model and configuration for wavelet.
//!
//! Everything the store, monitor, analyzer, and server agree on lives here:
//! influencers, posts, trend briefs, trending topics, and [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod influencer;
pub mod post;
pub mod trends;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use influencer::{Influencer, InfluencerPatch, NewInfluencer, Platform};
pub use post::{clamp_sentiment_score, NewPost, Post, Sentiment};
pub use trends::{NewTrendBrief, TrendBrief, TrendingTopic};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown sentiment: {0}")]
    UnknownSentiment(String),
}
