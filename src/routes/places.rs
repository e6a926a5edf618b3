use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::edit_requests::{EditRequest, RequestStatus};
use crate::store::operations::favorites::Favorite;
use crate::store::operations::places::Place;
use crate::store::operations::reports::{Report, ReportType};
use crate::store::operations::reviews::Review;
use crate::store::operations::users::Role;
use crate::validation::{validate_coordinates, validate_rating};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_places).post(create_place))
        .route("/:id", get(get_place))
        .route("/:id/view", post(record_view))
        .route("/:id/reviews", get(list_reviews).post(create_review))
        .route(
            "/:id/favorite",
            get(favorite_status).post(add_favorite).delete(remove_favorite),
        )
        .route("/:id/reports", post(create_report))
        .route("/:id/edit-requests", post(create_edit_request))
}

#[derive(Debug, Deserialize)]
struct ListPlacesQuery {
    search: Option<String>,
}

async fn list_places(
    Query(q): Query<ListPlacesQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let places = match q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(term) => state.store().search_places_by_address(term.trim())?,
        None => state.store().list_places()?,
    };
    Ok(ok(places))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlaceRequest {
    latitude: f64,
    longitude: f64,
    road_address: String,
    description: Option<String>,
}

async fn create_place(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePlaceRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if let Err(msg) = validate_coordinates(req.latitude, req.longitude) {
        return Err(AppError::bad_request("PLACE_INVALID_COORDINATES", msg));
    }
    if req.road_address.trim().is_empty() {
        return Err(AppError::bad_request(
            "PLACE_INVALID_ADDRESS",
            "Road address is required",
        ));
    }

    let now = Utc::now();
    let place = Place {
        id: uuid::Uuid::new_v4().to_string(),
        latitude: req.latitude,
        longitude: req.longitude,
        road_address: req.road_address.trim().to_string(),
        description: req.description.unwrap_or_default(),
        view_count: 0,
        review_count: 0,
        average_rating: 0.0,
        created_by: Some(auth.user_id),
        created_at: now,
        updated_at: now,
    };

    state.store().create_place(&place)?;
    Ok(created(place))
}

async fn get_place(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let place = state
        .store()
        .get_place(&id)?
        .ok_or_else(|| AppError::not_found("Place not found"))?;
    Ok(ok(place))
}

async fn record_view(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let place = state.store().increment_place_view_count(&id)?;
    Ok(ok(serde_json::json!({"viewCount": place.view_count})))
}

async fn list_reviews(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().require_place(&id)?;
    let reviews = state.store().list_reviews_for_place(&id)?;
    Ok(ok(reviews))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReviewRequest {
    rating: i32,
    comment: Option<String>,
}

async fn create_review(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateReviewRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if let Err(msg) = validate_rating(req.rating) {
        return Err(AppError::bad_request("REVIEW_INVALID_RATING", msg));
    }
    state.store().require_place(&id)?;

    let review = Review {
        id: uuid::Uuid::new_v4().to_string(),
        place_id: id,
        user_id: auth.user_id,
        rating: req.rating,
        comment: req.comment.unwrap_or_default(),
        created_at: Utc::now(),
    };

    // Returns the place with its rollup already refreshed.
    let place = state.store().create_review(&review)?;
    Ok(created(serde_json::json!({
        "review": review,
        "reviewCount": place.review_count,
        "averageRating": place.average_rating,
    })))
}

async fn add_favorite(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().require_place(&id)?;
    let favorite = Favorite {
        user_id: auth.user_id,
        place_id: id,
        created_at: Utc::now(),
    };
    state.store().add_favorite(&favorite)?;
    Ok(created(serde_json::json!({"favorited": true})))
}

async fn remove_favorite(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    state.store().remove_favorite(&auth.user_id, &id)?;
    Ok(ok(serde_json::json!({"favorited": false})))
}

async fn favorite_status(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let favorited = state.store().is_favorited(&auth.user_id, &id)?;
    Ok(ok(serde_json::json!({"favorited": favorited})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateReportRequest {
    #[serde(rename = "type")]
    report_type: ReportType,
    content: Option<String>,
}

async fn create_report(
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateReportRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if req.report_type == ReportType::Other
        && req.content.as_deref().map_or(true, |c| c.trim().is_empty())
    {
        return Err(AppError::bad_request(
            "REPORT_CONTENT_REQUIRED",
            "Content is required for this report type",
        ));
    }
    state.store().require_place(&id)?;

    // Regular users may report a place once; admins and anonymous
    // reporters are exempt.
    let enforce_once = auth.as_ref().map_or(false, |u| u.role != Role::Admin);

    let report = Report {
        id: uuid::Uuid::new_v4().to_string(),
        place_id: id,
        user_id: auth.map(|u| u.user_id),
        report_type: req.report_type,
        content: req.content.map(|c| c.trim().to_string()),
        created_at: Utc::now(),
    };

    state.store().create_report(&report, enforce_once)?;
    Ok(created(serde_json::json!({"reported": true})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEditRequestRequest {
    content: String,
}

async fn create_edit_request(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateEditRequestRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::bad_request(
            "EDIT_REQUEST_EMPTY",
            "Content is required",
        ));
    }
    state.store().require_place(&id)?;

    let request = EditRequest {
        id: uuid::Uuid::new_v4().to_string(),
        place_id: id,
        user_id: auth.user_id,
        content: req.content.trim().to_string(),
        status: RequestStatus::Pending,
        created_at: Utc::now(),
    };

    state.store().create_edit_request(&request)?;
    Ok(created(request))
}
