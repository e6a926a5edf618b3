use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::analytics::report_groups::group_reports_by_place;
use crate::auth::AdminAuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports))
        .route("/reports/grouped", get(grouped_reports))
}

async fn list_reports(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let reports = state.store().list_reports()?;
    Ok(ok(reports))
}

async fn grouped_reports(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let groups = group_reports_by_place(state.store())?;
    Ok(ok(groups))
}
