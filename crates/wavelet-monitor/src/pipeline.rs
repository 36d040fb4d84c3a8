//! One monitoring tick: fetch, dedup, analyze, persist.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use wavelet_analyzer::{ContentAnalysis, ContentAnalyzer};
use wavelet_core::{Influencer, NewPost, Platform};
use wavelet_store::Store;
use wavelet_youtube::{ContentSource, YoutubeVideo};

use crate::error::MonitorError;

/// Videos requested from the content source per tick.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// What a single check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Influencer missing or inactive. Nothing was read from the source.
    Skipped,
    /// No fetcher exists for this platform yet.
    Unsupported(Platform),
    Completed {
        /// Fetched items that survived dedup.
        new_items: usize,
        created: usize,
        /// Posts persisted with the neutral fallback analysis.
        analysis_failures: usize,
    },
    /// The fetch or dedup step failed; the error was logged.
    Failed(String),
}

/// Shared state for the analysis pipeline, cloned into every timer job.
pub struct ContentPipeline {
    store: Arc<dyn Store>,
    source: Arc<dyn ContentSource>,
    analyzer: Arc<dyn ContentAnalyzer>,
    max_results: u32,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ContentPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        source: Arc<dyn ContentSource>,
        analyzer: Arc<dyn ContentAnalyzer>,
        max_results: u32,
    ) -> Self {
        Self {
            store,
            source,
            analyzer,
            max_results,
            locks: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    async fn lock_for(&self, influencer_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(influencer_id).or_default())
    }

    /// Run one check for `influencer_id`. Never returns an error: failures
    /// are logged and reported as [`CheckOutcome::Failed`].
    ///
    /// Checks for the same influencer are serialized; different influencers
    /// run independently.
    pub async fn check_for_new_content(&self, influencer_id: i64) -> CheckOutcome {
        let lock = self.lock_for(influencer_id).await;
        let outcome = {
            let _guard = lock.lock().await;
            match self.run_check(influencer_id).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(influencer_id, error = %e, "monitor: check failed");
                    CheckOutcome::Failed(e.to_string())
                }
            }
        };
        self.release_lock(influencer_id, lock).await;
        outcome
    }

    /// Drop the map entry once no other check holds or awaits it.
    async fn release_lock(&self, influencer_id: i64, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // One reference in the map plus ours; clones are only taken under
        // this map lock.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&influencer_id);
        }
    }

    async fn run_check(&self, influencer_id: i64) -> Result<CheckOutcome, MonitorError> {
        let Some(influencer) = self.store.get_influencer(influencer_id).await? else {
            tracing::debug!(influencer_id, "monitor: influencer not found; skipping");
            return Ok(CheckOutcome::Skipped);
        };
        if !influencer.is_active {
            tracing::debug!(influencer_id, "monitor: influencer inactive; skipping");
            return Ok(CheckOutcome::Skipped);
        }

        tracing::info!(influencer_id, name = %influencer.name, "monitor: checking for new content");

        let videos = match influencer.platform {
            Platform::Youtube => self.fetch_new_videos(&influencer).await?,
            other => {
                tracing::info!(
                    influencer_id,
                    platform = %other,
                    "monitor: {other} monitoring not yet implemented"
                );
                return Ok(CheckOutcome::Unsupported(other));
            }
        };

        let new_items = videos.len();
        let mut created = 0;
        let mut analysis_failures = 0;
        for video in videos {
            match self.process_video(&influencer, &video).await {
                Ok(analysis_ok) => {
                    created += 1;
                    if !analysis_ok {
                        analysis_failures += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        influencer_id,
                        video_id = %video.id,
                        error = %e,
                        "monitor: failed to save post"
                    );
                }
            }
        }

        if created > 0 {
            tracing::info!(influencer_id, created, "monitor: saved new posts");
        }

        Ok(CheckOutcome::Completed {
            new_items,
            created,
            analysis_failures,
        })
    }

    /// Latest videos whose title does not match the first line of any
    /// stored post for this influencer.
    async fn fetch_new_videos(
        &self,
        influencer: &Influencer,
    ) -> Result<Vec<YoutubeVideo>, MonitorError> {
        let videos = self
            .source
            .latest_videos(influencer.handle(), self.max_results)
            .await?;

        let existing = self.store.list_posts_by_influencer(influencer.id).await?;
        let mut seen: HashSet<String> = existing
            .iter()
            .filter_map(|p| p.dedup_key())
            .map(str::to_owned)
            .collect();

        Ok(videos
            .into_iter()
            .filter(|v| seen.insert(v.title.clone()))
            .collect())
    }

    /// Analyze and persist one video. Returns whether the analyzer succeeded.
    async fn process_video(
        &self,
        influencer: &Influencer,
        video: &YoutubeVideo,
    ) -> Result<bool, MonitorError> {
        let mut post = video_to_post(influencer, video);

        let (analysis, analysis_ok) = match self.analyzer.analyze(&post.content, post.platform).await
        {
            Ok(analysis) => (analysis, true),
            Err(e) => {
                tracing::warn!(
                    influencer_id = influencer.id,
                    error = %e,
                    "monitor: analysis failed, using defaults"
                );
                (ContentAnalysis::unavailable(), false)
            }
        };

        post.sentiment = Some(analysis.sentiment);
        post.sentiment_score = Some(analysis.sentiment.heuristic_score());
        post.topics = Some(analysis.topics);
        post.ai_summary = Some(analysis.summary);

        let saved = self.store.create_post(post).await?;
        tracing::debug!(
            post_id = saved.id,
            preview = %saved.content.chars().take(50).collect::<String>(),
            "monitor: saved post"
        );
        Ok(analysis_ok)
    }
}

/// Canonical post shape for a fetched video. Unparseable counters read as 0.
#[must_use]
pub fn video_to_post(influencer: &Influencer, video: &YoutubeVideo) -> NewPost {
    let mut post = NewPost::new(
        influencer.id,
        format!("{}\n\n{}", video.title, video.description),
        influencer.platform,
    );
    post.external_id = Some(video.id.clone());
    post.url = Some(video.watch_url());
    post.likes = parse_count(&video.statistics.like_count);
    post.comments = parse_count(&video.statistics.comment_count);
    post.views = Some(parse_count(&video.statistics.view_count));
    post.shares = 0;
    post.published_at = DateTime::parse_from_rfc3339(&video.published_at)
        .ok()
        .map(|d| d.with_timezone(&Utc));
    post
}

fn parse_count(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
