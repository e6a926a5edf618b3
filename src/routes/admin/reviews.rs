use axum::extract::{Path, State};
use axum::routing::delete;
use axum::Router;

use crate::auth::AdminAuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reviews/:id", delete(delete_review))
}

/// Moderation delete. The owning place's rollup is refreshed before the
/// response goes out, same as a user-initiated delete.
async fn delete_review(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let place = state.store().delete_review(&id)?;
    Ok(ok(serde_json::json!({
        "deleted": true,
        "reviewCount": place.review_count,
        "averageRating": place.average_rating,
    })))
}
