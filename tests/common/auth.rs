use axum::http::Method;
use axum::Router;

use super::http::{request, response_json};

/// Registers a fresh user and returns (token, user_id).
///
/// The first registration on a fresh app is promoted to admin, so tests
/// that need an admin must call this before creating any other accounts.
pub async fn register_and_get_token(app: &Router) -> (String, String) {
    let email = format!("user-{}@test.com", uuid::Uuid::new_v4());
    let name = format!("user-{}", uuid::Uuid::new_v4().simple());

    let response = request(
        app,
        Method::POST,
        "/api/auth/register",
        Some(serde_json::json!({
            "email": email,
            "name": name,
            "password": "Passw0rd!",
        })),
        &[],
    )
    .await;

    let (status, _headers, body) = response_json(response).await;
    assert!(status.is_success(), "register failed: {body}");

    let token = body["data"]["token"]
        .as_str()
        .expect("token in register response")
        .to_string();
    let user_id = body["data"]["user"]["id"]
        .as_str()
        .expect("user id in register response")
        .to_string();

    (token, user_id)
}

/// First registration on a fresh app: the resulting account is the admin.
pub async fn register_admin(app: &Router) -> (String, String) {
    register_and_get_token(app).await
}
