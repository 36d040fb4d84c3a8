//! In-process [`Store`] implementation.
//!
//! Each entity type lives in its own table behind its own lock, so writers to
//! different tables never contend. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use wavelet_core::{
    clamp_sentiment_score, Influencer, InfluencerPatch, NewInfluencer, NewPost, NewTrendBrief,
    Post, TrendBrief, TrendingTopic,
};

use crate::{Store, StoreError};

/// Rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    influencers: RwLock<Table<Influencer>>,
    posts: RwLock<Table<Post>>,
    trend_briefs: RwLock<Table<TrendBrief>>,
    trending_topics: RwLock<Table<TrendingTopic>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_influencers(&self) -> Result<Vec<Influencer>, StoreError> {
        let table = self.influencers.read().await;
        Ok(table
            .rows
            .values()
            .filter(|i| i.is_active)
            .cloned()
            .collect())
    }

    async fn get_influencer(&self, id: i64) -> Result<Option<Influencer>, StoreError> {
        Ok(self.influencers.read().await.rows.get(&id).cloned())
    }

    async fn create_influencer(&self, new: NewInfluencer) -> Result<Influencer, StoreError> {
        let mut table = self.influencers.write().await;
        Ok(table.insert_with(|id| Influencer {
            id,
            name: new.name,
            username: new.username,
            platform: new.platform,
            followers: new.followers,
            avatar: new.avatar,
            is_active: new.is_active,
            created_at: Utc::now(),
        }))
    }

    async fn update_influencer(
        &self,
        id: i64,
        patch: InfluencerPatch,
    ) -> Result<Option<Influencer>, StoreError> {
        let mut table = self.influencers.write().await;
        Ok(table.rows.get_mut(&id).map(|influencer| {
            patch.apply(influencer);
            influencer.clone()
        }))
    }

    async fn delete_influencer(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.influencers.write().await.rows.remove(&id).is_some())
    }

    async fn list_posts(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        // Ids are handed out in insertion order, so descending id is newest
        // first regardless of wall-clock adjustments.
        let table = self.posts.read().await;
        Ok(table.rows.values().rev().take(limit).cloned().collect())
    }

    async fn list_posts_by_influencer(&self, influencer_id: i64) -> Result<Vec<Post>, StoreError> {
        let table = self.posts.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|p| p.influencer_id == influencer_id)
            .cloned()
            .collect())
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut table = self.posts.write().await;
        Ok(table.insert_with(|id| Post {
            id,
            influencer_id: new.influencer_id,
            content: new.content,
            platform: new.platform,
            likes: new.likes,
            comments: new.comments,
            shares: new.shares,
            views: new.views,
            external_id: new.external_id,
            url: new.url,
            published_at: new.published_at,
            sentiment: new.sentiment,
            sentiment_score: new.sentiment_score.map(clamp_sentiment_score),
            topics: new.topics,
            ai_summary: new.ai_summary,
            created_at: Utc::now(),
        }))
    }

    async fn count_posts(&self) -> Result<usize, StoreError> {
        Ok(self.posts.read().await.rows.len())
    }

    async fn list_trend_briefs(&self) -> Result<Vec<TrendBrief>, StoreError> {
        let table = self.trend_briefs.read().await;
        let mut briefs: Vec<TrendBrief> = table.rows.values().cloned().collect();
        drop(table);
        briefs.sort_by(|a, b| {
            b.generated_at
                .cmp(&a.generated_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(briefs)
    }

    async fn latest_trend_brief(&self) -> Result<Option<TrendBrief>, StoreError> {
        Ok(self.list_trend_briefs().await?.into_iter().next())
    }

    async fn create_trend_brief(&self, new: NewTrendBrief) -> Result<TrendBrief, StoreError> {
        let mut table = self.trend_briefs.write().await;
        Ok(table.insert_with(|id| TrendBrief {
            id,
            title: new.title,
            summary: new.summary,
            key_trends: new.key_trends,
            opportunities: new.opportunities,
            alerts: new.alerts,
            posts_analyzed: new.posts_analyzed,
            generated_at: Utc::now(),
        }))
    }

    async fn list_trending_topics(&self) -> Result<Vec<TrendingTopic>, StoreError> {
        let table = self.trending_topics.read().await;
        let mut topics: Vec<TrendingTopic> = table.rows.values().cloned().collect();
        drop(table);
        topics.sort_by(|a, b| b.growth.cmp(&a.growth).then(a.id.cmp(&b.id)));
        Ok(topics)
    }

    async fn upsert_trending_topic(
        &self,
        name: &str,
        mentions: i64,
        growth: Decimal,
    ) -> Result<TrendingTopic, StoreError> {
        let mut table = self.trending_topics.write().await;

        if let Some(existing) = table.rows.values_mut().find(|t| t.name == name) {
            existing.mentions = mentions;
            existing.growth = growth;
            existing.last_updated = Utc::now();
            return Ok(existing.clone());
        }

        Ok(table.insert_with(|id| TrendingTopic {
            id,
            name: name.to_string(),
            mentions,
            growth,
            last_updated: Utc::now(),
        }))
    }
}
