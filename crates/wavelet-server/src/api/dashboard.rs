use axum::{extract::State, Json};
use wavelet_monitor::{ai_insights, dashboard_metrics, AiInsights, DashboardMetrics};

use super::{internal, ApiError, AppState};

pub(super) async fn metrics(
    State(state): State<AppState>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    dashboard_metrics(state.store.as_ref())
        .await
        .map(Json)
        .map_err(internal("Failed to fetch dashboard metrics"))
}

pub(super) async fn insights(State(state): State<AppState>) -> Result<Json<AiInsights>, ApiError> {
    ai_insights(state.store.as_ref())
        .await
        .map(Json)
        .map_err(internal("Failed to fetch AI insights"))
}
