use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use wavelet_core::{Influencer, Post};

use super::{internal, ApiError, AppState};

/// Posts shown on the dashboard feed.
const RECENT_POST_LIMIT: usize = 10;

/// A post joined with its author. `influencer` is omitted when the author is
/// no longer in the active set.
#[derive(Debug, Serialize)]
pub(super) struct PostWithInfluencer {
    #[serde(flatten)]
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer: Option<Influencer>,
}

pub(super) async fn recent_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostWithInfluencer>>, ApiError> {
    let on_error = "Failed to fetch recent posts";
    let posts = state
        .store
        .list_posts(RECENT_POST_LIMIT)
        .await
        .map_err(internal(on_error))?;
    let influencers: HashMap<i64, Influencer> = state
        .store
        .list_influencers()
        .await
        .map_err(internal(on_error))?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let data = posts
        .into_iter()
        .map(|post| PostWithInfluencer {
            influencer: influencers.get(&post.influencer_id).cloned(),
            post,
        })
        .collect();

    Ok(Json(data))
}
