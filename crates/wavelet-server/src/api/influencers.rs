use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use wavelet_core::{Influencer, NewInfluencer, Platform};
use wavelet_monitor::CheckOutcome;

use super::{internal, ApiError, AppState, FieldError, MessageResponse};

pub(super) async fn list_influencers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Influencer>>, ApiError> {
    state
        .store
        .list_influencers()
        .await
        .map(Json)
        .map_err(internal("Failed to fetch influencers"))
}

pub(super) async fn create_influencer(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Influencer>), ApiError> {
    let body = body.map_err(|rejection| {
        ApiError::validation(
            "Invalid influencer data",
            vec![FieldError {
                path: Vec::new(),
                message: rejection.body_text(),
            }],
        )
    })?;
    let new = parse_new_influencer(&body)
        .map_err(|errors| ApiError::validation("Invalid influencer data", errors))?;

    let influencer = state
        .store
        .create_influencer(new)
        .await
        .map_err(internal("Failed to create influencer"))?;

    if influencer.is_active {
        if let Err(e) = state
            .monitor
            .start_monitoring(influencer.id, state.monitor_interval_minutes)
            .await
        {
            tracing::error!(
                influencer_id = influencer.id,
                error = %e,
                "api: failed to start monitoring new influencer"
            );
        }
    }

    tracing::info!(influencer_id = influencer.id, name = %influencer.name, "api: influencer created");
    Ok((StatusCode::CREATED, Json(influencer)))
}

pub(super) async fn delete_influencer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::not_found("Influencer not found"))?;

    if let Err(e) = state.monitor.stop_monitoring(id).await {
        tracing::warn!(influencer_id = id, error = %e, "api: failed to stop monitoring");
    }

    let deleted = state
        .store
        .delete_influencer(id)
        .await
        .map_err(internal("Failed to delete influencer"))?;
    if !deleted {
        return Err(ApiError::not_found("Influencer not found"));
    }

    Ok(MessageResponse::new("Influencer deleted successfully"))
}

pub(super) async fn refresh_influencer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid influencer ID"))?;

    // Check failures are logged by the pipeline and never reach the caller.
    match state.monitor.check_for_new_content(id).await {
        CheckOutcome::Failed(reason) => {
            tracing::warn!(influencer_id = id, reason = %reason, "api: manual refresh check failed");
        }
        outcome => {
            tracing::debug!(influencer_id = id, ?outcome, "api: manual refresh finished");
        }
    }
    Ok(MessageResponse::new("Content refresh triggered successfully"))
}

/// Validate a create request. Every problem is reported, not just the first.
pub(super) fn parse_new_influencer(body: &Value) -> Result<NewInfluencer, Vec<FieldError>> {
    let Some(fields) = body.as_object() else {
        return Err(vec![FieldError {
            path: Vec::new(),
            message: "Expected object".to_string(),
        }]);
    };

    let mut errors = Vec::new();
    let name = required_string(fields, "name", &mut errors);
    let username = required_string(fields, "username", &mut errors);

    let platform = match fields.get("platform") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("platform", "Required"));
            None
        }
        Some(Value::String(s)) => match s.parse::<Platform>() {
            Ok(p) => Some(p),
            Err(_) => {
                let expected: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
                errors.push(FieldError::new(
                    "platform",
                    format!("Invalid enum value. Expected {}", expected.join(" | ")),
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new("platform", "Expected string"));
            None
        }
    };

    let followers = match fields.get("followers") {
        None | Some(Value::Null) => Some(0),
        Some(v) => match v.as_i64() {
            Some(n) if n >= 0 => Some(n),
            Some(_) => {
                errors.push(FieldError::new("followers", "Must be zero or greater"));
                None
            }
            None => {
                errors.push(FieldError::new("followers", "Expected integer"));
                None
            }
        },
    };

    let avatar = match fields.get("avatar") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            errors.push(FieldError::new("avatar", "Expected string"));
            None
        }
    };

    let is_active = match fields.get("isActive") {
        None | Some(Value::Null) => Some(true),
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(FieldError::new("isActive", "Expected boolean"));
            None
        }
    };

    match (name, username, platform, followers, avatar, is_active) {
        (Some(name), Some(username), Some(platform), Some(followers), Some(avatar), Some(is_active))
            if errors.is_empty() =>
        {
            let mut new = NewInfluencer::new(name, username, platform);
            new.followers = followers;
            new.avatar = avatar;
            new.is_active = is_active;
            Ok(new)
        }
        _ => Err(errors),
    }
}

fn required_string(
    fields: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(field, "Must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            errors.push(FieldError::new(field, "Expected string"));
            None
        }
    }
}
