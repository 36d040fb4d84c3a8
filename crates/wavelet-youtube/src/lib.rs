//! Content source adapter for video platforms.
//!
//! [`ContentSource`] answers three questions about a channel handle: who is
//! it, what did it publish lately, and which channels match a search. Two
//! implementations ship: [`YoutubeClient`] talks to the `YouTube` Data API v3,
//! and [`DemoCatalog`] serves a fixed sample set for offline runs.

pub mod client;
pub mod demo;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use client::YoutubeClient;
pub use demo::DemoCatalog;
pub use error::YoutubeError;
pub use types::{
    ChannelStatistics, Thumbnail, Thumbnails, VideoStatistics, YoutubeChannel, YoutubeVideo,
};

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Most recent uploads for `handle`, newest first, at most `max_results`.
    /// Unknown channels yield an empty list.
    async fn latest_videos(
        &self,
        handle: &str,
        max_results: u32,
    ) -> Result<Vec<YoutubeVideo>, YoutubeError>;

    async fn channel_info(&self, handle: &str) -> Result<Option<YoutubeChannel>, YoutubeError>;

    async fn search_channels(&self, query: &str) -> Result<Vec<YoutubeChannel>, YoutubeError>;
}

/// Strip a leading `@` from a channel handle.
#[must_use]
pub fn clean_handle(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}
