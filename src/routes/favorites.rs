use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::places::Place;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_own_favorites))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteView {
    place: Place,
    favorited_at: chrono::DateTime<chrono::Utc>,
}

/// The caller's favorites, newest first, with each place embedded.
/// Favorites pointing at deleted places are skipped.
async fn list_own_favorites(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let favorites = state.store().list_favorites_for_user(&auth.user_id)?;

    let mut views = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        if let Some(place) = state.store().get_place(&favorite.place_id)? {
            views.push(FavoriteView {
                place,
                favorited_at: favorite.created_at,
            });
        }
    }
    Ok(ok(views))
}
