use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{
    generate_dummy_argon2_hash, hash_password, hash_token, sign_jwt_for_user, verify_password,
    AuthUser,
};
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::operations::sessions::Session;
use crate::store::operations::users::{Role, User};
use crate::validation::{is_valid_email, validate_name, validate_password};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Safe public view of a user (excludes password_hash).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    email: String,
    name: String,
    password: String,
}

async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request(
            "AUTH_INVALID_EMAIL",
            "Invalid email format",
        ));
    }
    let name = req.name.trim();
    if let Err(msg) = validate_name(name) {
        return Err(AppError::bad_request("AUTH_INVALID_NAME", msg));
    }
    if let Err(msg) = validate_password(&req.password) {
        return Err(AppError::bad_request("AUTH_WEAK_PASSWORD", msg));
    }

    if state.store().get_user_by_email(&email)?.is_some() {
        return Err(AppError::conflict(
            "AUTH_EMAIL_EXISTS",
            "Email already registered",
        ));
    }

    // The first account on a fresh deployment becomes the admin; everyone
    // after that starts as a regular user.
    let role = if state.store().count_users()? == 0 {
        Role::Admin
    } else {
        Role::User
    };

    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.clone(),
        name: name.to_string(),
        password_hash: hash_password(&req.password)?,
        role,
        created_at: now,
        updated_at: now,
    };

    state.store().create_user(&user)?;

    let token = issue_session(&user.id, &state)?;
    let payload = AuthResponse {
        token: token.clone(),
        user: UserProfile::from(&user),
    };

    let mut response = created(payload).into_response();
    set_token_cookie(&mut response, &token)?;
    Ok(response)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim().to_lowercase();
    let user = state.store().get_user_by_email(&email)?;

    // Verify against a dummy hash when the account doesn't exist so the
    // response time doesn't reveal which emails are registered.
    let hash = user
        .as_ref()
        .map(|u| u.password_hash.clone())
        .unwrap_or_else(generate_dummy_argon2_hash);
    let verified = verify_password(&req.password, &hash)?;

    let user = match user {
        Some(user) if verified => user,
        _ => return Err(AppError::unauthorized("Invalid email or password")),
    };

    let token = issue_session(&user.id, &state)?;
    let payload = AuthResponse {
        token: token.clone(),
        user: UserProfile::from(&user),
    };

    let mut response = ok(payload).into_response();
    set_token_cookie(&mut response, &token)?;
    Ok(response)
}

async fn logout(auth_user: AuthUser, State(state): State<AppState>) -> Result<Response, AppError> {
    state.store().delete_user_sessions(&auth_user.user_id)?;

    let mut response = ok(serde_json::json!({"loggedOut": true})).into_response();
    clear_token_cookie(&mut response)?;
    Ok(response)
}

async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store()
        .get_user_by_id(&auth_user.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserProfile::from(&user)))
}

fn issue_session(user_id: &str, state: &AppState) -> Result<String, AppError> {
    let config = state.config();
    let token = sign_jwt_for_user(user_id, &config.jwt_secret, config.jwt_expires_in_hours)?;

    let now = Utc::now();
    let session = Session {
        token_hash: hash_token(&token),
        user_id: user_id.to_string(),
        created_at: now,
        expires_at: now + Duration::hours(config.jwt_expires_in_hours as i64),
    };
    state.store().create_session(&session)?;

    Ok(token)
}

fn set_token_cookie(response: &mut Response, token: &str) -> Result<(), AppError> {
    let cookie = format!("token={token}; Path=/; SameSite=Strict; HttpOnly; Secure");
    append_set_cookie(response, &cookie, "token cookie set failed")
}

fn clear_token_cookie(response: &mut Response) -> Result<(), AppError> {
    append_set_cookie(
        response,
        "token=; Path=/; Max-Age=0; SameSite=Strict; HttpOnly; Secure",
        "token cookie clear failed",
    )
}

fn append_set_cookie(response: &mut Response, cookie: &str, context: &str) -> Result<(), AppError> {
    let value = cookie
        .parse()
        .map_err(|_| AppError::internal(context))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
