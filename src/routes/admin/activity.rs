use std::collections::HashMap;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::auth::AdminAuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activity-logs", get(activity_logs))
        .route("/heatmap", get(heatmap))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityLogView {
    id: String,
    activity_time: String,
    latitude: f64,
    longitude: f64,
    user_type: &'static str,
    /// Email for logged-in users, session id for visitors.
    identifier: String,
}

/// The most recent activity page, newest first. User emails are resolved
/// in one pass so the table doesn't hit the store per row.
async fn activity_logs(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let logs = state.store().list_recent_activity_logs()?;

    let mut emails: HashMap<String, String> = HashMap::new();
    for log in &logs {
        if let Some(user_id) = &log.user_id {
            if !emails.contains_key(user_id) {
                if let Some(user) = state.store().get_user_by_id(user_id)? {
                    emails.insert(user_id.clone(), user.email);
                }
            }
        }
    }

    let views: Vec<ActivityLogView> = logs
        .into_iter()
        .map(|log| {
            let (user_type, identifier) = match &log.user_id {
                Some(user_id) => (
                    "member",
                    emails
                        .get(user_id)
                        .cloned()
                        .unwrap_or_else(|| format!("ID: {user_id} (user record missing)")),
                ),
                None => ("guest", log.session_id.clone()),
            };
            ActivityLogView {
                id: log.id,
                activity_time: log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                latitude: log.latitude,
                longitude: log.longitude,
                user_type,
                identifier,
            }
        })
        .collect();

    Ok(ok(views))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeatmapPoint {
    latitude: f64,
    longitude: f64,
}

/// Every recorded coordinate, for heatmap rendering.
async fn heatmap(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let points: Vec<HeatmapPoint> = state
        .store()
        .list_all_activity_logs()?
        .into_iter()
        .map(|log| HeatmapPoint {
            latitude: log.latitude,
            longitude: log.longitude,
        })
        .collect();
    Ok(ok(points))
}
