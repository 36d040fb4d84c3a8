//! HTTP client for the `YouTube` Data API v3.
//!
//! Resolves channels by handle (`channels?forHandle=`), lists recent uploads
//! through `search?order=date`, and fills in statistics with a `videos`
//! lookup. Every request carries the API key as the `key` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::YoutubeError;
use crate::types::{
    ChannelStatistics, Thumbnails, VideoStatistics, YoutubeChannel, YoutubeVideo,
};
use crate::{clean_handle, ContentSource};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";
const SEARCH_PAGE_SIZE: u32 = 10;
/// The API rejects `maxResults` above 50.
const MAX_RESULTS_CAP: u32 = 50;

pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`YoutubeError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("wavelet/0.1 (influencer-monitoring)")
            .build()?;

        // Trailing slash so `join` appends the endpoint instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| YoutubeError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|_| YoutubeError::InvalidBaseUrl(self.base_url.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YoutubeError> {
        let url = self.build_url(endpoint, params)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: endpoint.to_string(),
            source: e,
        })
    }

    async fn channels_by(&self, param: (&str, &str)) -> Result<Vec<YoutubeChannel>, YoutubeError> {
        let list: ApiList<RawChannel> = self
            .get_json("channels", &[("part", "snippet,statistics"), param])
            .await?;
        Ok(list.items.into_iter().map(RawChannel::into_channel).collect())
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the
/// raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl ContentSource for YoutubeClient {
    async fn latest_videos(
        &self,
        handle: &str,
        max_results: u32,
    ) -> Result<Vec<YoutubeVideo>, YoutubeError> {
        let Some(channel) = self.channel_info(handle).await? else {
            tracing::debug!(handle, "youtube: channel not found");
            return Ok(Vec::new());
        };

        let max = max_results.clamp(1, MAX_RESULTS_CAP).to_string();
        let search: ApiList<RawSearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel.id.as_str()),
                    ("maxResults", max.as_str()),
                    ("order", "date"),
                    ("type", "video"),
                ],
            )
            .await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let videos: ApiList<RawVideo> = self
            .get_json("videos", &[("part", "snippet,statistics"), ("id", joined.as_str())])
            .await?;

        // Keep the search ordering (newest first).
        let mut videos: Vec<YoutubeVideo> =
            videos.items.into_iter().map(RawVideo::into_video).collect();
        videos.sort_by_key(|v| ids.iter().position(|id| *id == v.id).unwrap_or(usize::MAX));
        Ok(videos)
    }

    async fn channel_info(&self, handle: &str) -> Result<Option<YoutubeChannel>, YoutubeError> {
        let for_handle = format!("@{}", clean_handle(handle));
        let channels = self.channels_by(("forHandle", for_handle.as_str())).await?;
        Ok(channels.into_iter().next())
    }

    async fn search_channels(&self, query: &str) -> Result<Vec<YoutubeChannel>, YoutubeError> {
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let search: ApiList<RawSearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("q", query),
                    ("maxResults", page_size.as_str()),
                ],
            )
            .await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.channel_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        self.channels_by(("id", joined.as_str())).await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnails {
    default: Option<RawThumbnail>,
}

impl RawThumbnails {
    fn into_thumbnails(self) -> Thumbnails {
        Thumbnails::from_url(self.default.map(|t| t.url).unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: RawThumbnails,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    channel_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChannelStatistics {
    subscriber_count: Option<String>,
    video_count: Option<String>,
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    id: String,
    snippet: RawSnippet,
    #[serde(default)]
    statistics: RawChannelStatistics,
}

impl RawChannel {
    fn into_channel(self) -> YoutubeChannel {
        YoutubeChannel {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            thumbnails: self.snippet.thumbnails.into_thumbnails(),
            statistics: ChannelStatistics {
                subscriber_count: count_or_zero(self.statistics.subscriber_count),
                video_count: count_or_zero(self.statistics.video_count),
                view_count: count_or_zero(self.statistics.view_count),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSearchId {
    video_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    id: RawSearchId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: String,
    snippet: RawSnippet,
    #[serde(default)]
    statistics: RawVideoStatistics,
}

impl RawVideo {
    fn into_video(self) -> YoutubeVideo {
        YoutubeVideo {
            id: self.id,
            title: self.snippet.title,
            description: self.snippet.description,
            thumbnails: self.snippet.thumbnails.into_thumbnails(),
            statistics: VideoStatistics {
                view_count: count_or_zero(self.statistics.view_count),
                like_count: count_or_zero(self.statistics.like_count),
                comment_count: count_or_zero(self.statistics.comment_count),
            },
            published_at: self.snippet.published_at,
            channel_title: self.snippet.channel_title,
            channel_id: self.snippet.channel_id,
        }
    }
}

/// Hidden counters (e.g. disabled likes) are omitted by the API.
fn count_or_zero(value: Option<String>) -> String {
    value.unwrap_or_else(|| "0".to_string())
}
