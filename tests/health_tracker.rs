mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn record_and_read_back_daily_metrics() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "john@example.com", "pw123").await;

    let record = post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "calories": 2000, "steps": 8000, "mvpa": 45, "sleep": 7, "date": "2024-07-25" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(record.status(), StatusCode::CREATED);

    let dashboard = get(&app, &format!("/health_tracker/{}", user_id), Some(&cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = body_json(dashboard).await;
    assert_eq!(body["stats"]["calories"], 2000);
    assert_eq!(body["stats"]["steps"], 8000);
    assert_eq!(body["stats"]["mvpa"], 45);
    assert_eq!(body["stats"]["sleep"], 7.0);

    let by_date = get(&app, "/get-health-data?date=2024-07-25", Some(&cookie)).await;
    assert_eq!(by_date.status(), StatusCode::OK);
    let records = body_json(by_date).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["calories"], 2000);
    assert_eq!(records[0]["date"], "2024-07-25");
}

#[tokio::test]
async fn dashboard_shows_latest_submission() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "late@example.com", "pw123").await;
    let uri = format!("/health_tracker/{}", user_id);

    post_json(
        &app,
        &uri,
        json!({ "calories": 1500, "steps": 3000, "date": "2024-07-24" }),
        Some(&cookie),
    )
    .await;
    post_json(
        &app,
        &uri,
        json!({ "calories": 2500, "steps": 9000, "date": "2024-07-25" }),
        Some(&cookie),
    )
    .await;

    let body = body_json(get(&app, &uri, Some(&cookie)).await).await;
    assert_eq!(body["stats"]["calories"], 2500);
    assert_eq!(body["stats"]["steps"], 9000);
}

#[tokio::test]
async fn dashboard_defaults_to_zero_without_records() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "fresh@example.com", "pw123").await;

    let response = get(&app, &format!("/health_tracker/{}", user_id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["stats"]["calories"], 0);
    assert_eq!(body["stats"]["steps"], 0);
    assert_eq!(body["stats"]["mvpa"], 0);
    assert_eq!(body["stats"]["sleep"], 0.0);
}

#[tokio::test]
async fn absent_metric_fields_are_stored_as_null() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "partial@example.com", "pw123").await;

    let response = post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "steps": 4200, "date": "2024-07-26" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = body_json(get(&app, "/get-health-data?date=2024-07-26", Some(&cookie)).await).await;
    assert_eq!(records[0]["steps"], 4200);
    assert!(records[0]["calories"].is_null());
    assert!(records[0]["sleep"].is_null());
}

#[tokio::test]
async fn out_of_range_metric_is_rejected() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "bounds@example.com", "pw123").await;

    let response = post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "sleep": 30.0, "date": "2024-07-25" }),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn negative_metric_is_rejected() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "negative@example.com", "pw123").await;

    let response = post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "steps": -1, "date": "2024-07-25" }),
        Some(&cookie),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records = body_json(get(&app, "/get-health-data?date=2024-07-25", Some(&cookie)).await).await;
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn save_notes_reports_whether_a_record_matched() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "notes@example.com", "pw123").await;

    post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "steps": 100, "date": "2024-07-25" }),
        Some(&cookie),
    )
    .await;

    let hit = post_json(
        &app,
        "/save-notes",
        json!({ "date": "2024-07-25", "notes": "felt great" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(hit.status(), StatusCode::OK);
    assert_eq!(body_json(hit).await["success"], true);

    let miss = post_json(
        &app,
        "/save-notes",
        json!({ "date": "1999-01-01", "notes": "nothing here" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(miss.status(), StatusCode::OK);
    assert_eq!(body_json(miss).await["success"], false);

    let records = body_json(get(&app, "/get-health-data?date=2024-07-25", Some(&cookie)).await).await;
    assert_eq!(records[0]["notes"], "felt great");
}

#[tokio::test]
async fn profile_includes_history_and_friends() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "prof@example.com", "pw123").await;
    let (_, friend_id) = signup(&app, "pal@example.com", "pw123").await;

    post_json(
        &app,
        &format!("/health_tracker/{}", user_id),
        json!({ "steps": 500, "date": "2024-07-20" }),
        Some(&cookie),
    )
    .await;
    post_json(
        &app,
        "/add-friend",
        json!({ "friend_id": friend_id }),
        Some(&cookie),
    )
    .await;

    let response = get(&app, &format!("/profile/{}", user_id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], user_id);
    assert_eq!(body["health_stats"].as_array().unwrap().len(), 1);
    assert_eq!(body["friends"].as_array().unwrap().len(), 1);
    assert_eq!(body["friends"][0]["friend_name"], "pal");
}

#[tokio::test]
async fn dashboard_for_unknown_user_is_not_found() {
    let (app, _pool) = test_app().await;
    let (cookie, _) = signup(&app, "someone@example.com", "pw123").await;

    let response = get(&app, "/health_tracker/9999", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
