use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AdminAuthUser;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::edit_requests::EditRequest;
use crate::store::operations::places::Place;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/places", get(list_places))
        .route(
            "/places/:id",
            get(place_detail).put(update_description).delete(delete_place),
        )
        .route("/places/:id/edit-requests", get(list_edit_requests))
}

/// Back-office row: the place plus the counts the list view shows.
/// Favorite and pending counts are grouped on demand, not stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminPlaceView {
    #[serde(flatten)]
    place: Place,
    favorite_count: u64,
    pending_edit_request_count: u64,
}

#[derive(Debug, Deserialize)]
struct ListPlacesQuery {
    search: Option<String>,
}

async fn list_places(
    _admin: AdminAuthUser,
    Query(q): Query<ListPlacesQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let places = match q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(term) => state.store().search_places_by_address(term.trim())?,
        None => state.store().list_places()?,
    };

    let favorite_counts = state.store().count_favorites_by_place()?;
    let pending_counts = state.store().count_pending_edit_requests_by_place()?;

    let views: Vec<AdminPlaceView> = places
        .into_iter()
        .map(|place| {
            let favorite_count = favorite_counts.get(&place.id).copied().unwrap_or(0);
            let pending_edit_request_count =
                pending_counts.get(&place.id).copied().unwrap_or(0);
            AdminPlaceView {
                place,
                favorite_count,
                pending_edit_request_count,
            }
        })
        .collect();

    Ok(ok(views))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminPlaceDetail {
    #[serde(flatten)]
    place: Place,
    pending_edit_requests: Vec<EditRequest>,
}

async fn place_detail(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let place = state.store().require_place(&id)?;
    let pending_edit_requests = state.store().list_pending_edit_requests_for_place(&id)?;
    Ok(ok(AdminPlaceDetail {
        place,
        pending_edit_requests,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDescriptionRequest {
    description: String,
}

/// Applying a description update settles every pending edit request for
/// the place.
async fn update_description(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateDescriptionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let place = state
        .store()
        .update_place_description(&id, req.description.trim())?;
    let reviewed = state.store().mark_edit_requests_reviewed(&id)?;

    Ok(ok(serde_json::json!({
        "place": place,
        "reviewedEditRequests": reviewed,
    })))
}

async fn delete_place(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().delete_place(&id)?;
    Ok(ok(serde_json::json!({"deleted": true})))
}

async fn list_edit_requests(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().require_place(&id)?;
    let requests = state.store().list_pending_edit_requests_for_place(&id)?;
    Ok(ok(requests))
}
