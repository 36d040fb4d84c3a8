//! Entity storage for wavelet.
//!
//! [`Store`] is the only way other crates reach influencers, posts, trend
//! briefs, and trending topics. [`MemoryStore`] keeps everything in process
//! memory; a durable backend can implement the same trait.

mod memory;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use wavelet_core::{
    Influencer, InfluencerPatch, NewInfluencer, NewPost, NewTrendBrief, Post, TrendBrief,
    TrendingTopic,
};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// CRUD operations over every entity type.
///
/// Ids are assigned by the store, increase monotonically per entity type,
/// and are never reused.
#[async_trait]
pub trait Store: Send + Sync {
    /// Active influencers only, ordered by id.
    async fn list_influencers(&self) -> Result<Vec<Influencer>, StoreError>;

    /// Any influencer, active or not.
    async fn get_influencer(&self, id: i64) -> Result<Option<Influencer>, StoreError>;

    async fn create_influencer(&self, new: NewInfluencer) -> Result<Influencer, StoreError>;

    /// Returns `None` when no influencer has this id.
    async fn update_influencer(
        &self,
        id: i64,
        patch: InfluencerPatch,
    ) -> Result<Option<Influencer>, StoreError>;

    /// Hard delete. Posts referencing the influencer are kept.
    /// Returns whether a row was removed.
    async fn delete_influencer(&self, id: i64) -> Result<bool, StoreError>;

    /// At most `limit` posts, newest first.
    async fn list_posts(&self, limit: usize) -> Result<Vec<Post>, StoreError>;

    /// All posts for one influencer id, newest first.
    async fn list_posts_by_influencer(&self, influencer_id: i64) -> Result<Vec<Post>, StoreError>;

    /// Scores outside `[0, 1]` are clamped on write.
    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError>;

    async fn count_posts(&self) -> Result<usize, StoreError>;

    /// Newest first.
    async fn list_trend_briefs(&self) -> Result<Vec<TrendBrief>, StoreError>;

    async fn latest_trend_brief(&self) -> Result<Option<TrendBrief>, StoreError>;

    async fn create_trend_brief(&self, new: NewTrendBrief) -> Result<TrendBrief, StoreError>;

    /// All topics, highest growth first.
    async fn list_trending_topics(&self) -> Result<Vec<TrendingTopic>, StoreError>;

    /// Insert or overwrite the topic with this `name`.
    async fn upsert_trending_topic(
        &self,
        name: &str,
        mentions: i64,
        growth: Decimal,
    ) -> Result<TrendingTopic, StoreError>;
}
