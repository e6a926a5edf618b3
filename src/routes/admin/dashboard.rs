use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::analytics::chart::build_chart_series;
use crate::analytics::dashboard::{dashboard_data, stats_data};
use crate::analytics::period::Range;
use crate::auth::AdminAuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/chart", get(dashboard_chart))
        .route("/stats", get(stats))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    range: Option<String>,
}

async fn dashboard(
    _admin: AdminAuthUser,
    Query(q): Query<RangeQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let range = Range::from_token(q.range.as_deref().unwrap_or_default());
    let data = dashboard_data(state.store(), range, Utc::now())?;
    Ok(ok(data))
}

async fn dashboard_chart(
    _admin: AdminAuthUser,
    Query(q): Query<RangeQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let range = Range::from_token(q.range.as_deref().unwrap_or_default());
    let chart_data = build_chart_series(state.store(), range, Utc::now().date_naive())?;
    Ok(ok(serde_json::json!({"chartData": chart_data})))
}

async fn stats(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let data = stats_data(state.store(), Utc::now())?;
    Ok(ok(data))
}
