use axum::extract::{Path, State};
use axum::routing::delete;
use axum::Router;

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:id", delete(delete_own_review))
}

/// Users may delete their own reviews; everything else is admin-only.
async fn delete_own_review(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let review = state
        .store()
        .get_review(&id)?
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if review.user_id != auth.user_id {
        return Err(AppError::forbidden("You do not own this review"));
    }

    let place = state.store().delete_review(&id)?;
    Ok(ok(serde_json::json!({
        "deleted": true,
        "reviewCount": place.review_count,
        "averageRating": place.average_rating,
    })))
}
