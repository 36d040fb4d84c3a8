//! Hand-written fakes shared by the monitor integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use wavelet_analyzer::{
    AnalysisError, ContentAnalysis, ContentAnalyzer, TopicStat, TrendBriefData,
};
use wavelet_core::{Influencer, NewInfluencer, NewPost, Platform, Post, Sentiment};
use wavelet_monitor::ContentPipeline;
use wavelet_store::{MemoryStore, Store};
use wavelet_youtube::{
    ContentSource, Thumbnails, VideoStatistics, YoutubeChannel, YoutubeError, YoutubeVideo,
};

pub fn video(id: &str, title: &str) -> YoutubeVideo {
    YoutubeVideo {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("About {title}"),
        thumbnails: Thumbnails::from_url(format!("https://i.ytimg.com/vi/{id}/default.jpg")),
        statistics: VideoStatistics {
            view_count: "1000".to_string(),
            like_count: "100".to_string(),
            comment_count: "10".to_string(),
        },
        published_at: "2024-05-01T08:00:00Z".to_string(),
        channel_title: "Test Channel".to_string(),
        channel_id: "UC_TEST".to_string(),
    }
}

/// Returns a scripted list of videos and counts every fetch.
#[derive(Default)]
pub struct ScriptedSource {
    videos: Mutex<Vec<YoutubeVideo>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn with_videos(videos: Vec<YoutubeVideo>) -> Self {
        Self {
            videos: Mutex::new(videos),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn latest_videos(
        &self,
        _handle: &str,
        max_results: u32,
    ) -> Result<Vec<YoutubeVideo>, YoutubeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(YoutubeError::Api {
                status: 500,
                message: "backend exploded".to_string(),
            });
        }
        let videos = self.videos.lock().await;
        Ok(videos.iter().take(max_results as usize).cloned().collect())
    }

    async fn channel_info(&self, _handle: &str) -> Result<Option<YoutubeChannel>, YoutubeError> {
        Ok(None)
    }

    async fn search_channels(&self, _query: &str) -> Result<Vec<YoutubeChannel>, YoutubeError> {
        Ok(Vec::new())
    }
}

/// Classifies everything with one sentiment, or fails on demand.
pub struct FixedAnalyzer {
    pub sentiment: Sentiment,
    pub native_score: Decimal,
    pub fail: bool,
}

impl FixedAnalyzer {
    pub fn new(sentiment: Sentiment) -> Self {
        Self {
            sentiment,
            native_score: Decimal::new(95, 2),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Sentiment::Positive)
        }
    }
}

#[async_trait]
impl ContentAnalyzer for FixedAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        _platform: Platform,
    ) -> Result<ContentAnalysis, AnalysisError> {
        if self.fail {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(ContentAnalysis {
            summary: format!("summary of {}", text.lines().next().unwrap_or_default()),
            sentiment: self.sentiment,
            sentiment_score: self.native_score,
            topics: vec!["#Testing".to_string()],
            key_insights: Vec::new(),
        })
    }

    async fn generate_brief(
        &self,
        posts: &[Post],
        _influencers: &[Influencer],
    ) -> Result<TrendBriefData, AnalysisError> {
        if self.fail {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(TrendBriefData {
            summary: format!("{} posts reviewed", posts.len()),
            key_trends: vec!["Testing is trending".to_string()],
            opportunities: Vec::new(),
            alerts: Vec::new(),
            top_topics: vec![TopicStat {
                name: "#Testing".to_string(),
                mentions: 42,
                growth: Decimal::new(125, 1),
            }],
        })
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub source: Arc<ScriptedSource>,
    pub pipeline: Arc<ContentPipeline>,
}

pub fn harness(source: ScriptedSource, analyzer: FixedAnalyzer) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(source);
    let pipeline = Arc::new(ContentPipeline::new(
        Arc::clone(&store) as Arc<dyn Store>,
        Arc::clone(&source) as Arc<dyn ContentSource>,
        Arc::new(analyzer),
        5,
    ));
    Harness {
        store,
        source,
        pipeline,
    }
}

pub async fn add_influencer(store: &MemoryStore, platform: Platform, active: bool) -> Influencer {
    let mut new = NewInfluencer::new("Test Creator", "@tester", platform);
    new.is_active = active;
    store.create_influencer(new).await.expect("create influencer")
}

/// Store a post whose first line is `title`, as a previous tick would have.
pub async fn add_existing_post(store: &MemoryStore, influencer_id: i64, title: &str) -> Post {
    let new = NewPost::new(
        influencer_id,
        format!("{title}\n\nseen before"),
        Platform::Youtube,
    );
    store.create_post(new).await.expect("create post")
}
