mod common;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use common::app::spawn_test_app;
use common::auth::register_and_get_token;
use common::http::{assert_json_error, assert_status_ok_json, bearer, request, response_json};

async fn create_place(app: &axum::Router, token: &str, road_address: &str) -> Value {
    let response = request(
        app,
        Method::POST,
        "/api/places",
        Some(serde_json::json!({
            "latitude": 37.5665,
            "longitude": 126.9780,
            "roadAddress": road_address,
            "description": "corner bench by the entrance",
        })),
        &bearer(token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "create place failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn it_places_create_requires_auth() {
    let test_app = spawn_test_app().await;

    let response = request(
        &test_app.app,
        Method::POST,
        "/api/places",
        Some(serde_json::json!({
            "latitude": 37.0,
            "longitude": 127.0,
            "roadAddress": "Somewhere 1",
        })),
        &[],
    )
    .await;

    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_places_create_rejects_bad_coordinates() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;

    let response = request(
        &test_app.app,
        Method::POST,
        "/api/places",
        Some(serde_json::json!({
            "latitude": 95.0,
            "longitude": 127.0,
            "roadAddress": "Somewhere 1",
        })),
        &bearer(&token),
    )
    .await;

    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "PLACE_INVALID_COORDINATES");
}

#[tokio::test]
async fn it_places_create_and_fetch() {
    let test_app = spawn_test_app().await;
    let (token, user_id) = register_and_get_token(&test_app.app).await;

    let place = create_place(&test_app.app, &token, "Sejong-daero 110").await;
    let place_id = place["id"].as_str().expect("place id");
    assert_eq!(place["roadAddress"], "Sejong-daero 110");
    assert_eq!(place["reviewCount"], 0);
    assert_eq!(place["averageRating"], 0.0);
    assert_eq!(place["createdBy"], user_id.as_str());

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
    assert_eq!(body["data"]["id"], place_id);
}

#[tokio::test]
async fn it_places_list_and_search() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;

    create_place(&test_app.app, &token, "Gangnam-daero 396").await;
    create_place(&test_app.app, &token, "Teheran-ro 152").await;

    let all = request(&test_app.app, Method::GET, "/api/places", None, &[]).await;
    let (status, _headers, body) = response_json(all).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let filtered = request(
        &test_app.app,
        Method::GET,
        "/api/places?search=Teheran",
        None,
        &[],
    )
    .await;
    let (status, _headers, body) = response_json(filtered).await;
    assert_status_ok_json(status, &body);
    let results = body["data"].as_array().expect("array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["roadAddress"], "Teheran-ro 152");
}

#[tokio::test]
async fn it_places_view_count_increments() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;

    let place = create_place(&test_app.app, &token, "Viewed 1").await;
    let place_id = place["id"].as_str().expect("place id");

    for expected in 1..=3u64 {
        let response = request(
            &test_app.app,
            Method::POST,
            &format!("/api/places/{place_id}/view"),
            None,
            &[],
        )
        .await;
        let (status, _headers, body) = response_json(response).await;
        assert_status_ok_json(status, &body);
        assert_eq!(body["data"]["viewCount"], expected);
    }
}

#[tokio::test]
async fn it_places_unknown_id_not_found() {
    let test_app = spawn_test_app().await;

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/places/no-such-place",
        None,
        &[],
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn it_places_favorite_roundtrip() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;

    let place = create_place(&test_app.app, &token, "Favorited 1").await;
    let place_id = place["id"].as_str().expect("place id");

    let add = request(
        &test_app.app,
        Method::POST,
        &format!("/api/places/{place_id}/favorite"),
        None,
        &bearer(&token),
    )
    .await;
    assert_eq!(add.status(), StatusCode::CREATED);

    // Favoriting twice is a conflict.
    let again = request(
        &test_app.app,
        Method::POST,
        &format!("/api/places/{place_id}/favorite"),
        None,
        &bearer(&token),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let status_resp = request(
        &test_app.app,
        Method::GET,
        &format!("/api/places/{place_id}/favorite"),
        None,
        &bearer(&token),
    )
    .await;
    let (status, _headers, body) = response_json(status_resp).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["favorited"], true);

    let list = request(
        &test_app.app,
        Method::GET,
        "/api/favorites",
        None,
        &bearer(&token),
    )
    .await;
    let (status, _headers, body) = response_json(list).await;
    assert_status_ok_json(status, &body);
    let favorites = body["data"].as_array().expect("array");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["place"]["id"], place_id);
    assert!(favorites[0]["favoritedAt"].as_str().is_some());

    let remove = request(
        &test_app.app,
        Method::DELETE,
        &format!("/api/places/{place_id}/favorite"),
        None,
        &bearer(&token),
    )
    .await;
    assert_eq!(remove.status(), StatusCode::OK);

    let status_resp = request(
        &test_app.app,
        Method::GET,
        &format!("/api/places/{place_id}/favorite"),
        None,
        &bearer(&token),
    )
    .await;
    let (_status, _headers, body) = response_json(status_resp).await;
    assert_eq!(body["data"]["favorited"], false);
}

#[tokio::test]
async fn it_places_edit_request_created_as_pending() {
    let test_app = spawn_test_app().await;
    let (token, _) = register_and_get_token(&test_app.app).await;

    let place = create_place(&test_app.app, &token, "Edited 1").await;
    let place_id = place["id"].as_str().expect("place id");

    let response = request(
        &test_app.app,
        Method::POST,
        &format!("/api/places/{place_id}/edit-requests"),
        Some(serde_json::json!({"content": "the bench moved to the other side"})),
        &bearer(&token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["placeId"], place_id);
}
