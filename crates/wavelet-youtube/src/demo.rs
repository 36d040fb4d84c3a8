//! Fixed sample catalog used when no `YouTube` API key is configured.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::YoutubeError;
use crate::types::{ChannelStatistics, Thumbnails, VideoStatistics, YoutubeChannel, YoutubeVideo};
use crate::{clean_handle, ContentSource};

/// Two channels and three videos. Publish times are relative to the moment
/// the catalog is built.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    channels: Vec<(&'static str, YoutubeChannel)>,
    videos: Vec<YoutubeVideo>,
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoCatalog {
    #[must_use]
    pub fn new() -> Self {
        let channels = vec![
            (
                "aliabdaal",
                channel(
                    "UCoOae5nYA7VqaXzerajD0lg",
                    "Ali Abdaal",
                    "Physician, YouTuber, and Entrepreneur",
                    "https://yt3.ggpht.com/ytc/AOPolaQlBXL9QQQ",
                    ("3200000", "485", "285000000"),
                ),
            ),
            (
                "mkbhd",
                channel(
                    "UCBJycsmduvYEL83R_U4JriQ",
                    "Marques Brownlee",
                    "Tech reviews and more",
                    "https://yt3.ggpht.com/ytc/AOPolaRbVBpqaMB",
                    ("17800000", "1250", "3200000000"),
                ),
            ),
        ];

        let videos = vec![
            video(
                "dQw4w9WgXcQ",
                "The ULTIMATE Productivity Setup for 2024",
                "Here's how I organize my entire life using these amazing productivity tools...",
                ("1245000", "42000", "1250"),
                2,
                ("Ali Abdaal", "UCoOae5nYA7VqaXzerajD0lg"),
            ),
            video(
                "abc123def456",
                "iPhone 15 Pro Max Review: The Complete Truth",
                "After 3 months of testing, here's everything you need to know about Apple's latest flagship...",
                ("2800000", "125000", "3400"),
                5,
                ("Marques Brownlee", "UCBJycsmduvYEL83R_U4JriQ"),
            ),
            video(
                "xyz789ghi012",
                "My Morning Routine: How I Stay Productive as a Doctor + YouTuber",
                "The exact morning routine that helps me balance medicine, content creation, and entrepreneurship...",
                ("856000", "28000", "890"),
                8,
                ("Ali Abdaal", "UCoOae5nYA7VqaXzerajD0lg"),
            ),
        ];

        Self { channels, videos }
    }

    fn lookup(&self, handle: &str) -> Option<&YoutubeChannel> {
        let handle = clean_handle(handle);
        self.channels
            .iter()
            .find(|(key, _)| *key == handle)
            .map(|(_, channel)| channel)
    }
}

fn channel(
    id: &str,
    title: &str,
    description: &str,
    thumbnail: &str,
    (subscribers, videos, views): (&str, &str, &str),
) -> YoutubeChannel {
    YoutubeChannel {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        thumbnails: Thumbnails::from_url(thumbnail),
        statistics: ChannelStatistics {
            subscriber_count: subscribers.to_string(),
            video_count: videos.to_string(),
            view_count: views.to_string(),
        },
    }
}

fn video(
    id: &str,
    title: &str,
    description: &str,
    (views, likes, comments): (&str, &str, &str),
    hours_ago: i64,
    (channel_title, channel_id): (&str, &str),
) -> YoutubeVideo {
    YoutubeVideo {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        thumbnails: Thumbnails::from_url(format!("https://i.ytimg.com/vi/{id}/default.jpg")),
        statistics: VideoStatistics {
            view_count: views.to_string(),
            like_count: likes.to_string(),
            comment_count: comments.to_string(),
        },
        published_at: (Utc::now() - Duration::hours(hours_ago)).to_rfc3339(),
        channel_title: channel_title.to_string(),
        channel_id: channel_id.to_string(),
    }
}

#[async_trait]
impl ContentSource for DemoCatalog {
    async fn latest_videos(
        &self,
        handle: &str,
        max_results: u32,
    ) -> Result<Vec<YoutubeVideo>, YoutubeError> {
        let Some(channel) = self.lookup(handle) else {
            return Ok(Vec::new());
        };
        let needle = clean_handle(handle).to_lowercase();
        let limit = usize::try_from(max_results).unwrap_or(usize::MAX);

        Ok(self
            .videos
            .iter()
            .filter(|v| {
                v.channel_id == channel.id || v.channel_title.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn channel_info(&self, handle: &str) -> Result<Option<YoutubeChannel>, YoutubeError> {
        Ok(self.lookup(handle).cloned())
    }

    async fn search_channels(&self, query: &str) -> Result<Vec<YoutubeChannel>, YoutubeError> {
        let query = query.to_lowercase();
        Ok(self
            .channels
            .iter()
            .map(|(_, channel)| channel)
            .filter(|c| {
                c.title.to_lowercase().contains(&query)
                    || c.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }
}
