use axum::{extract::State, Json};
use wavelet_core::{TrendBrief, TrendingTopic};

use super::{internal, ApiError, AppState};

const TOP_TOPIC_LIMIT: usize = 10;

pub(super) async fn trending_topics(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrendingTopic>>, ApiError> {
    let mut topics = state
        .store
        .list_trending_topics()
        .await
        .map_err(internal("Failed to fetch trending topics"))?;
    topics.truncate(TOP_TOPIC_LIMIT);
    Ok(Json(topics))
}

pub(super) async fn generate_brief(
    State(state): State<AppState>,
) -> Result<Json<TrendBrief>, ApiError> {
    state
        .briefs
        .generate()
        .await
        .map(Json)
        .map_err(internal("Failed to generate trend brief"))
}

pub(super) async fn list_briefs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrendBrief>>, ApiError> {
    state
        .store
        .list_trend_briefs()
        .await
        .map(Json)
        .map_err(internal("Failed to fetch trend briefs"))
}
