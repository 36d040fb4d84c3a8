mod dashboard;
mod influencers;
mod posts;
mod trends;
mod youtube;

#[cfg(test)]
mod tests;

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use wavelet_monitor::{MonitoringService, TrendBriefGenerator};
use wavelet_store::Store;
use wavelet_youtube::ContentSource;

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub source: Arc<dyn ContentSource>,
    pub monitor: Arc<MonitoringService>,
    pub briefs: Arc<TrendBriefGenerator>,
    /// Interval applied to influencers created through the API.
    pub monitor_interval_minutes: u64,
}

/// One failed field in a request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Error response: `{message}` plus `errors` for validation failures.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                errors: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: message.into(),
                errors: Some(errors),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Log `error` and turn it into a 500 carrying only `message`.
pub(super) fn internal<E: Display>(message: &'static str) -> impl FnOnce(E) -> ApiError {
    move |error| {
        tracing::error!(error = %error, "{message}");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard/metrics", get(dashboard::metrics))
        .route("/api/ai-insights", get(dashboard::insights))
        .route("/api/posts/recent", get(posts::recent_posts))
        .route(
            "/api/influencers",
            get(influencers::list_influencers).post(influencers::create_influencer),
        )
        .route("/api/influencers/{id}", delete(influencers::delete_influencer))
        .route(
            "/api/influencers/{id}/refresh",
            post(influencers::refresh_influencer),
        )
        .route("/api/trending-topics", get(trends::trending_topics))
        .route("/api/trend-brief/generate", post(trends::generate_brief))
        .route("/api/trend-briefs", get(trends::list_briefs))
        .route("/api/youtube/search", get(youtube::search_channels))
        .route("/api/youtube/channel/{handle}", get(youtube::channel_info))
        .route("/api/youtube/videos/{handle}", get(youtube::latest_videos))
}

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map_or("-", |id| id.0.as_str());
        tracing::info_span!(
            "http",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %request_id,
        )
    });

    api_router()
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(trace),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    monitored_influencers: usize,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        monitored_influencers: state.monitor.monitored_ids().await.len(),
    })
}
