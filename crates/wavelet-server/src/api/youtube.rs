use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use wavelet_youtube::{YoutubeChannel, YoutubeVideo};

use super::{internal, ApiError, AppState};

const DEFAULT_VIDEO_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideosQuery {
    pub limit: Option<String>,
}

pub(super) async fn search_channels(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<YoutubeChannel>>, ApiError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter is required"))?;

    state
        .source
        .search_channels(&query)
        .await
        .map(Json)
        .map_err(internal("Failed to search YouTube channels"))
}

pub(super) async fn channel_info(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<YoutubeChannel>, ApiError> {
    state
        .source
        .channel_info(&handle)
        .await
        .map_err(internal("Failed to fetch channel info"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Channel not found"))
}

pub(super) async fn latest_videos(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(params): Query<VideosQuery>,
) -> Result<Json<Vec<YoutubeVideo>>, ApiError> {
    let limit = parse_limit(params.limit.as_deref())?;

    state
        .source
        .latest_videos(&handle, limit)
        .await
        .map(Json)
        .map_err(internal("Failed to fetch latest videos"))
}

/// `None` means the default; anything but a positive integer is rejected.
fn parse_limit(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw {
        None => Ok(DEFAULT_VIDEO_LIMIT),
        Some(value) => value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ApiError::bad_request("limit must be a positive integer")),
    }
}
