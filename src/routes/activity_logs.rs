use axum::extract::State;
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::MaybeAuthUser;
use crate::extractors::JsonBody;
use crate::response::{created, AppError};
use crate::state::AppState;
use crate::store::operations::activity_logs::ActivityLog;
use crate::validation::validate_coordinates;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(record_activity))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordActivityRequest {
    latitude: f64,
    longitude: f64,
    session_id: String,
}

/// Position ping from the map front end. Anonymous visitors are
/// identified by their session id only.
async fn record_activity(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RecordActivityRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if let Err(msg) = validate_coordinates(req.latitude, req.longitude) {
        return Err(AppError::bad_request("ACTIVITY_INVALID_COORDINATES", msg));
    }
    if req.session_id.trim().is_empty() {
        return Err(AppError::bad_request(
            "ACTIVITY_INVALID_SESSION",
            "Session id is required",
        ));
    }

    let log = ActivityLog {
        id: uuid::Uuid::new_v4().to_string(),
        latitude: req.latitude,
        longitude: req.longitude,
        user_id: auth.map(|u| u.user_id),
        session_id: req.session_id,
        created_at: Utc::now(),
    };

    state.store().append_activity_log(&log)?;
    Ok(created(serde_json::json!({"recorded": true})))
}
