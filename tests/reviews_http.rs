mod common;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use common::app::spawn_test_app;
use common::auth::{register_admin, register_and_get_token};
use common::http::{assert_json_error, assert_status_ok_json, bearer, request, response_json};

async fn create_place(app: &axum::Router, token: &str) -> String {
    let response = request(
        app,
        Method::POST,
        "/api/places",
        Some(serde_json::json!({
            "latitude": 37.5,
            "longitude": 127.0,
            "roadAddress": "Reviewed-ro 1",
        })),
        &bearer(token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "create place failed: {body}");
    body["data"]["id"].as_str().expect("place id").to_string()
}

async fn post_review(
    app: &axum::Router,
    token: &str,
    place_id: &str,
    rating: i32,
) -> (StatusCode, Value) {
    let response = request(
        app,
        Method::POST,
        &format!("/api/places/{place_id}/reviews"),
        Some(serde_json::json!({"rating": rating, "comment": "fine spot"})),
        &bearer(token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    (status, body)
}

#[tokio::test]
async fn it_reviews_create_refreshes_rollup() {
    let test_app = spawn_test_app().await;
    let (token_a, _) = register_and_get_token(&test_app.app).await;
    let (token_b, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &token_a).await;

    let (status, body) = post_review(&test_app.app, &token_a, &place_id, 4).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["reviewCount"], 1);
    assert_eq!(body["data"]["averageRating"], 4.0);

    let (status, body) = post_review(&test_app.app, &token_b, &place_id, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["reviewCount"], 2);
    assert_eq!(body["data"]["averageRating"], 4.5);

    // The stored place reflects the same rollup immediately.
    let response = request(
        &test_app.app,
        Method::GET,
        &format!("/api/places/{place_id}"),
        None,
        &[],
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["reviewCount"], 2);
    assert_eq!(body["data"]["averageRating"], 4.5);
}

#[tokio::test]
async fn it_reviews_duplicate_per_user_conflict() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &token).await;

    let (status, _body) = post_review(&test_app.app, &token, &place_id, 4).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_review(&test_app.app, &token, &place_id, 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn it_reviews_rating_out_of_range_rejected() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &token).await;

    let (status, body) = post_review(&test_app.app, &token, &place_id, 6).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "REVIEW_INVALID_RATING");
}

#[tokio::test]
async fn it_reviews_delete_last_zeroes_rollup() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &token).await;

    let (status, body) = post_review(&test_app.app, &token, &place_id, 3).await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["data"]["review"]["id"].as_str().expect("review id").to_string();

    let response = request(
        &test_app.app,
        Method::DELETE,
        &format!("/api/reviews/{review_id}"),
        None,
        &bearer(&token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["reviewCount"], 0);
    assert_eq!(body["data"]["averageRating"], 0.0);
}

#[tokio::test]
async fn it_reviews_delete_requires_ownership() {
    let test_app = spawn_test_app().await;
    let (owner_token, _) = register_and_get_token(&test_app.app).await;
    let (other_token, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &owner_token).await;

    let (_status, body) = post_review(&test_app.app, &owner_token, &place_id, 4).await;
    let review_id = body["data"]["review"]["id"].as_str().expect("review id").to_string();

    let response = request(
        &test_app.app,
        Method::DELETE,
        &format!("/api/reviews/{review_id}"),
        None,
        &bearer(&other_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_json_error(&body, "FORBIDDEN");
}

#[tokio::test]
async fn it_reviews_admin_delete_any_review() {
    let test_app = spawn_test_app().await;
    let (admin_token, _) = register_admin(&test_app.app).await;
    let (user_token, _) = register_and_get_token(&test_app.app).await;
    let place_id = create_place(&test_app.app, &user_token).await;

    let (_status, body) = post_review(&test_app.app, &user_token, &place_id, 2).await;
    let review_id = body["data"]["review"]["id"].as_str().expect("review id").to_string();

    let response = request(
        &test_app.app,
        Method::DELETE,
        &format!("/api/admin/reviews/{review_id}"),
        None,
        &bearer(&admin_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["reviewCount"], 0);
}
