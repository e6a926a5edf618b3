use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::auth::AdminAuthUser;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::routes::auth::UserProfile;
use crate::state::AppState;
use crate::store::operations::users::Role;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/contributions", get(user_contributions))
        .route("/users/:id/role", axum::routing::put(update_role))
}

async fn list_users(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let users = state.store().list_users()?;
    let views: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    Ok(ok(views))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserContribution {
    user_id: String,
    name: String,
    email: String,
    place_count: u64,
}

/// Places registered per user, most prolific first. Users who have never
/// registered a place are omitted.
async fn user_contributions(
    _admin: AdminAuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let counts = state.store().count_places_by_creator()?;

    let mut contributions = Vec::with_capacity(counts.len());
    for (user_id, place_count) in counts {
        if let Some(user) = state.store().get_user_by_id(&user_id)? {
            contributions.push(UserContribution {
                user_id,
                name: user.name,
                email: user.email,
                place_count,
            });
        }
    }
    contributions.sort_by(|a, b| b.place_count.cmp(&a.place_count));

    Ok(ok(contributions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRoleRequest {
    role: String,
}

async fn update_role(
    _admin: AdminAuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateRoleRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| AppError::bad_request("USER_INVALID_ROLE", "Unknown role"))?;

    state.store().update_user_role(&id, role)?;
    Ok(ok(serde_json::json!({"updated": true})))
}
