mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};

use placemap_backend::store::operations::places::Place;

use common::app::spawn_test_app;
use common::auth::{register_admin, register_and_get_token};
use common::http::{assert_json_error, assert_status_ok_json, bearer, request, response_json};

fn place_at(id: &str, created_at: chrono::DateTime<Utc>) -> Place {
    Place {
        id: id.to_string(),
        latitude: 37.5,
        longitude: 127.0,
        road_address: format!("{id} road"),
        description: String::new(),
        view_count: 0,
        review_count: 0,
        average_rating: 0.0,
        created_by: None,
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
async fn it_dashboard_requires_admin() {
    let test_app = spawn_test_app().await;
    register_admin(&test_app.app).await;
    let (user_token, _) = register_and_get_token(&test_app.app).await;

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/admin/dashboard",
        None,
        &bearer(&user_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_json_error(&body, "FORBIDDEN");
}

#[tokio::test]
async fn it_dashboard_daily_growth_against_yesterday() {
    let test_app = spawn_test_app().await;
    let (admin_token, _) = register_admin(&test_app.app).await;

    let now = Utc::now();
    let store = test_app.state.store();
    store.create_place(&place_at("today-1", now)).unwrap();
    store.create_place(&place_at("today-2", now)).unwrap();
    store
        .create_place(&place_at("yesterday-1", now - Duration::days(1)))
        .unwrap();

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/admin/dashboard?range=daily",
        None,
        &bearer(&admin_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["totalPlaces"], 3);
    assert_eq!(data["periodPlacesCount"], 2);
    assert_eq!(data["placesGrowthRate"], 100.0);
    assert_eq!(data["newPlacesChartData"]["daily"], 2);
}

#[tokio::test]
async fn it_dashboard_unknown_range_falls_back_to_weekly() {
    let test_app = spawn_test_app().await;
    let (admin_token, _) = register_admin(&test_app.app).await;

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/admin/dashboard?range=fortnightly",
        None,
        &bearer(&admin_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);

    // The singleton chart maps are keyed by the resolved range token.
    assert!(body["data"]["newPlacesChartData"].get("weekly").is_some());
    assert!(body["data"]["newUsersChartData"].get("weekly").is_some());
}

#[tokio::test]
async fn it_dashboard_counts_registered_users() {
    let test_app = spawn_test_app().await;
    let (admin_token, _) = register_admin(&test_app.app).await;
    register_and_get_token(&test_app.app).await;

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/admin/dashboard?range=monthly",
        None,
        &bearer(&admin_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["totalUsers"], 2);
    assert_eq!(body["data"]["newUsersChartData"]["monthly"], 2);
}

#[tokio::test]
async fn it_stats_counts_calendar_windows() {
    let test_app = spawn_test_app().await;
    let (admin_token, _) = register_admin(&test_app.app).await;

    let now = Utc::now();
    let store = test_app.state.store();
    store.create_place(&place_at("recent", now)).unwrap();
    // Far enough back to fall outside every window of the current year.
    store
        .create_place(&place_at("ancient", now - Duration::days(400)))
        .unwrap();

    let response = request(
        &test_app.app,
        Method::GET,
        "/api/admin/stats",
        None,
        &bearer(&admin_token),
    )
    .await;
    let (status, _headers, body) = response_json(response).await;
    assert_status_ok_json(status, &body);

    let data = &body["data"];
    assert_eq!(data["placesDaily"], 1);
    assert_eq!(data["placesWeekly"], 1);
    assert_eq!(data["placesMonthly"], 1);
    assert_eq!(data["placesYearly"], 1);
    // The admin account itself registered moments ago.
    assert_eq!(data["usersDaily"], 1);
}
