use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use wavelet_analyzer::{ContentAnalyzer, LexiconAnalyzer};
use wavelet_core::{
    Influencer, InfluencerPatch, NewInfluencer, NewPost, NewTrendBrief, Platform, Post,
    TrendBrief, TrendingTopic,
};
use wavelet_monitor::{ContentPipeline, MonitoringService, TrendBriefGenerator};
use wavelet_store::{MemoryStore, Store, StoreError};
use wavelet_youtube::{ContentSource, DemoCatalog, YoutubeChannel, YoutubeError, YoutubeVideo};

use super::*;

async fn state_with(store: Arc<dyn Store>) -> AppState {
    state_with_source(store, Arc::new(DemoCatalog::new())).await
}

async fn state_with_source(store: Arc<dyn Store>, source: Arc<dyn ContentSource>) -> AppState {
    let analyzer: Arc<dyn ContentAnalyzer> = Arc::new(LexiconAnalyzer::new());
    let pipeline = Arc::new(ContentPipeline::new(
        Arc::clone(&store),
        Arc::clone(&source),
        Arc::clone(&analyzer),
        5,
    ));
    let monitor = Arc::new(
        MonitoringService::new(pipeline, 30)
            .await
            .expect("monitor starts"),
    );
    let briefs = Arc::new(TrendBriefGenerator::new(Arc::clone(&store), analyzer));
    AppState {
        store,
        source,
        monitor,
        briefs,
        monitor_interval_minutes: 30,
    }
}

async fn memory_state() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = state_with(Arc::clone(&store) as Arc<dyn Store>).await;
    (store, state)
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_app(state.clone())
        .oneshot(request)
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn method(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn add_mkbhd(store: &MemoryStore, is_active: bool) -> Influencer {
    let mut new = NewInfluencer::new("Marques Brownlee", "@mkbhd", Platform::Youtube);
    new.is_active = is_active;
    store.create_influencer(new).await.expect("insert influencer")
}

/// Store whose every call fails, for the 500 paths.
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl Store for BrokenStore {
    async fn list_influencers(&self) -> Result<Vec<Influencer>, StoreError> {
        Err(broken())
    }
    async fn get_influencer(&self, _id: i64) -> Result<Option<Influencer>, StoreError> {
        Err(broken())
    }
    async fn create_influencer(&self, _new: NewInfluencer) -> Result<Influencer, StoreError> {
        Err(broken())
    }
    async fn update_influencer(
        &self,
        _id: i64,
        _patch: InfluencerPatch,
    ) -> Result<Option<Influencer>, StoreError> {
        Err(broken())
    }
    async fn delete_influencer(&self, _id: i64) -> Result<bool, StoreError> {
        Err(broken())
    }
    async fn list_posts(&self, _limit: usize) -> Result<Vec<Post>, StoreError> {
        Err(broken())
    }
    async fn list_posts_by_influencer(&self, _id: i64) -> Result<Vec<Post>, StoreError> {
        Err(broken())
    }
    async fn create_post(&self, _new: NewPost) -> Result<Post, StoreError> {
        Err(broken())
    }
    async fn count_posts(&self) -> Result<usize, StoreError> {
        Err(broken())
    }
    async fn list_trend_briefs(&self) -> Result<Vec<TrendBrief>, StoreError> {
        Err(broken())
    }
    async fn latest_trend_brief(&self) -> Result<Option<TrendBrief>, StoreError> {
        Err(broken())
    }
    async fn create_trend_brief(&self, _new: NewTrendBrief) -> Result<TrendBrief, StoreError> {
        Err(broken())
    }
    async fn list_trending_topics(&self) -> Result<Vec<TrendingTopic>, StoreError> {
        Err(broken())
    }
    async fn upsert_trending_topic(
        &self,
        _name: &str,
        _mentions: i64,
        _growth: Decimal,
    ) -> Result<TrendingTopic, StoreError> {
        Err(broken())
    }
}

#[test]
fn validation_error_serializes_field_paths() {
    let error = ApiError::validation(
        "Invalid influencer data",
        vec![FieldError::new("name", "Required")],
    );
    assert_eq!(error.status, StatusCode::BAD_REQUEST);
    let json = serde_json::to_value(&error.body).expect("serialize");
    assert_eq!(
        json,
        json!({
            "message": "Invalid influencer data",
            "errors": [{"path": ["name"], "message": "Required"}]
        })
    );
}

#[test]
fn plain_error_omits_errors_field() {
    let json = serde_json::to_value(&ApiError::not_found("Channel not found").body)
        .expect("serialize");
    assert_eq!(json, json!({"message": "Channel not found"}));
}

#[tokio::test]
async fn health_reports_ok_and_mints_request_id() {
    let (_, state) = memory_state().await;
    let response = build_app(state)
        .oneshot(get("/api/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("request id header");
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn supplied_request_id_is_echoed() {
    let (_, state) = memory_state().await;
    let request = Request::builder()
        .uri("/api/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .expect("request");
    let response = build_app(state).oneshot(request).await.expect("response");

    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some(&b"req-abc"[..])
    );
}

#[tokio::test]
async fn metrics_on_empty_store_are_zero() {
    let (_, state) = memory_state().await;
    let (status, json) = send(&state, get("/api/dashboard/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "trackedInfluencers": 0,
            "postsAnalyzed": 0,
            "trendingTopics": 0,
            "engagementScore": 0
        })
    );
}

#[tokio::test]
async fn create_influencer_returns_201_and_starts_monitoring() {
    let (_, state) = memory_state().await;
    let (status, json) = send(
        &state,
        post_json(
            "/api/influencers",
            &json!({"name": "MKBHD", "username": "@mkbhd", "platform": "youtube"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["username"], "@mkbhd");
    assert_eq!(json["isActive"], true);
    assert_eq!(json["followers"], 0);
    let id = json["id"].as_i64().expect("id");
    assert_eq!(state.monitor.monitored_ids().await, vec![id]);

    let (status, list) = send(&state, get("/api/influencers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn inactive_influencer_is_not_monitored() {
    let (_, state) = memory_state().await;
    let (status, _) = send(
        &state,
        post_json(
            "/api/influencers",
            &json!({
                "name": "Paused",
                "username": "@paused",
                "platform": "twitter",
                "isActive": false
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(state.monitor.monitored_ids().await.is_empty());
}

#[tokio::test]
async fn invalid_influencer_is_rejected_with_field_errors() {
    let (store, state) = memory_state().await;
    let (status, json) = send(
        &state,
        post_json("/api/influencers", &json!({"name": "No handle", "platform": "vine"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid influencer data");
    let errors = json["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["path"], json!(["username"]));
    assert_eq!(errors[1]["path"], json!(["platform"]));
    assert!(store.list_influencers().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let (_, state) = memory_state().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/influencers")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\":"))
        .expect("request");
    let (status, json) = send(&state, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid influencer data");
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn delete_removes_influencer_and_its_timer() {
    let (store, state) = memory_state().await;
    let influencer = add_mkbhd(&store, true).await;
    state
        .monitor
        .start_monitoring(influencer.id, 30)
        .await
        .unwrap();

    let (status, json) = send(
        &state,
        method("DELETE", &format!("/api/influencers/{}", influencer.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Influencer deleted successfully");
    assert!(state.monitor.monitored_ids().await.is_empty());
    assert!(store.get_influencer(influencer.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_or_malformed_id_is_404() {
    let (_, state) = memory_state().await;

    let (status, json) = send(&state, method("DELETE", "/api/influencers/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Influencer not found");

    let (status, _) = send(&state, method("DELETE", "/api/influencers/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_rejects_non_numeric_id() {
    let (_, state) = memory_state().await;
    let (status, json) = send(&state, method("POST", "/api/influencers/abc/refresh")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid influencer ID");
}

#[tokio::test]
async fn refresh_stores_new_posts_shown_in_recent_feed() {
    let (store, state) = memory_state().await;
    let influencer = add_mkbhd(&store, true).await;

    let (status, json) = send(
        &state,
        method("POST", &format!("/api/influencers/{}/refresh", influencer.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Content refresh triggered successfully");

    let (status, posts) = send(&state, get("/api/posts/recent")).await;
    assert_eq!(status, StatusCode::OK);
    let posts = posts.as_array().expect("posts array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["influencerId"], influencer.id);
    assert_eq!(posts[0]["influencer"]["name"], "Marques Brownlee");
    assert_eq!(posts[0]["url"], "https://youtube.com/watch?v=abc123def456");
}

/// Source whose every call fails with an upstream 503.
struct DownSource;

fn upstream_down() -> YoutubeError {
    YoutubeError::Api {
        status: 503,
        message: "backend unavailable".to_string(),
    }
}

#[async_trait]
impl ContentSource for DownSource {
    async fn latest_videos(
        &self,
        _handle: &str,
        _max_results: u32,
    ) -> Result<Vec<YoutubeVideo>, YoutubeError> {
        Err(upstream_down())
    }
    async fn channel_info(&self, _handle: &str) -> Result<Option<YoutubeChannel>, YoutubeError> {
        Err(upstream_down())
    }
    async fn search_channels(&self, _query: &str) -> Result<Vec<YoutubeChannel>, YoutubeError> {
        Err(upstream_down())
    }
}

#[tokio::test]
async fn refresh_with_failing_fetch_still_succeeds() {
    let store = Arc::new(MemoryStore::new());
    let state = state_with_source(Arc::clone(&store) as Arc<dyn Store>, Arc::new(DownSource)).await;
    let influencer = add_mkbhd(&store, true).await;

    let (status, json) = send(
        &state,
        method("POST", &format!("/api/influencers/{}/refresh", influencer.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Content refresh triggered successfully");
    assert_eq!(store.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn refresh_with_unreadable_store_still_succeeds() {
    let state = state_with(Arc::new(BrokenStore)).await;
    let (status, json) = send(&state, method("POST", "/api/influencers/1/refresh")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Content refresh triggered successfully");
}

#[tokio::test]
async fn youtube_passthrough_failures_are_500s() {
    let state = state_with_source(Arc::new(MemoryStore::new()), Arc::new(DownSource)).await;

    let (status, json) = send(&state, get("/api/youtube/channel/mkbhd")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "message": "Failed to fetch channel info" }));

    let (status, json) = send(&state, get("/api/youtube/videos/mkbhd")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "message": "Failed to fetch latest videos" }));
}

#[tokio::test]
async fn recent_posts_omit_inactive_authors() {
    let (store, state) = memory_state().await;
    let influencer = add_mkbhd(&store, false).await;
    store
        .create_post(NewPost::new(influencer.id, "Hidden author", Platform::Youtube))
        .await
        .unwrap();

    let (_, posts) = send(&state, get("/api/posts/recent")).await;
    assert_eq!(posts[0]["content"], "Hidden author");
    assert!(posts[0].get("influencer").is_none());
}

#[tokio::test]
async fn trending_topics_are_capped_at_ten_by_growth() {
    let (store, state) = memory_state().await;
    for i in 0..12 {
        store
            .upsert_trending_topic(&format!("#Topic{i}"), 10, Decimal::from(i))
            .await
            .unwrap();
    }

    let (status, json) = send(&state, get("/api/trending-topics")).await;
    assert_eq!(status, StatusCode::OK);
    let topics = json.as_array().expect("topics array");
    assert_eq!(topics.len(), 10);
    assert_eq!(topics[0]["name"], "#Topic11");
    assert_eq!(topics[9]["name"], "#Topic2");
}

#[tokio::test]
async fn generated_brief_is_listed() {
    let (store, state) = memory_state().await;
    let influencer = add_mkbhd(&store, true).await;
    store
        .create_post(NewPost::new(
            influencer.id,
            "Loving the new #Camera setup, amazing results",
            Platform::Youtube,
        ))
        .await
        .unwrap();

    let (status, brief) = send(&state, method("POST", "/api/trend-brief/generate")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(brief["title"]
        .as_str()
        .is_some_and(|t| t.starts_with("Trend Brief - ")));
    assert_eq!(brief["postsAnalyzed"], 1);

    let (status, briefs) = send(&state, get("/api/trend-briefs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(briefs[0]["id"], brief["id"]);
}

#[tokio::test]
async fn insights_have_all_three_snippets() {
    let (_, state) = memory_state().await;
    let (status, json) = send(&state, get("/api/ai-insights")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["keyTrend"].as_str().is_some_and(|s| s.contains("0%")));
    assert!(json["opportunity"].is_string());
    assert!(json["alert"].is_string());
}

#[tokio::test]
async fn youtube_search_requires_query() {
    let (_, state) = memory_state().await;

    let (status, json) = send(&state, get("/api/youtube/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Query parameter is required");

    let (status, _) = send(&state, get("/api/youtube/search?query=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&state, get("/api/youtube/search?query=tech")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.is_array());
}

#[tokio::test]
async fn youtube_channel_lookup() {
    let (_, state) = memory_state().await;

    let (status, json) = send(&state, get("/api/youtube/channel/@aliabdaal")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Ali Abdaal");

    let (status, json) = send(&state, get("/api/youtube/channel/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Channel not found");
}

#[tokio::test]
async fn youtube_videos_honor_limit() {
    let (_, state) = memory_state().await;

    let (status, json) = send(&state, get("/api/youtube/videos/aliabdaal")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(2));

    let (_, json) = send(&state, get("/api/youtube/videos/aliabdaal?limit=1")).await;
    assert_eq!(json.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&state, get("/api/youtube/videos/aliabdaal?limit=zero")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_failures_become_generic_500s() {
    let state = state_with(Arc::new(BrokenStore)).await;

    for (request, message) in [
        (get("/api/dashboard/metrics"), "Failed to fetch dashboard metrics"),
        (get("/api/posts/recent"), "Failed to fetch recent posts"),
        (get("/api/influencers"), "Failed to fetch influencers"),
        (get("/api/trending-topics"), "Failed to fetch trending topics"),
        (get("/api/trend-briefs"), "Failed to fetch trend briefs"),
        (get("/api/ai-insights"), "Failed to fetch AI insights"),
        (
            method("POST", "/api/trend-brief/generate"),
            "Failed to generate trend brief",
        ),
        (method("DELETE", "/api/influencers/1"), "Failed to delete influencer"),
    ] {
        let (status, json) = send(&state, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{message}");
        assert_eq!(json, json!({ "message": message }));
    }
}
