mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn search_is_case_insensitive_substring_match() {
    let (app, _pool) = test_app().await;
    let (cookie, _) = signup(&app, "seeker@example.com", "pw123").await;
    post_json(
        &app,
        "/signup",
        json!({ "email": "x@y.com", "password": "pw123", "username": "MaraRunner" }),
        None,
    )
    .await;
    post_json(
        &app,
        "/signup",
        json!({ "email": "z@y.com", "password": "pw123", "username": "swimmer" }),
        None,
    )
    .await;

    let response = post_json(
        &app,
        "/search-friend",
        json!({ "username": "runner" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["username"], "MaraRunner");
    assert!(results[0].get("email").is_none());
}

#[tokio::test]
async fn add_and_remove_a_friend() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "me@example.com", "pw123").await;
    let (_, friend_id) = signup(&app, "buddy@example.com", "pw123").await;

    let added = post_json(
        &app,
        "/add-friend",
        json!({ "friend_id": friend_id, "message": "train together?" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(added.status(), StatusCode::CREATED);
    let body = body_json(added).await;
    assert_eq!(body["friend"]["friend_name"], "buddy");
    assert_eq!(body["friend"]["message"], "train together?");
    let link_id = body["friend"]["id"].as_i64().unwrap();

    let profile = body_json(get(&app, &format!("/profile/{}", user_id), Some(&cookie)).await).await;
    assert_eq!(profile["friends"].as_array().unwrap().len(), 1);

    let removed = post_json(
        &app,
        &format!("/remove-friend/{}", link_id),
        json!({}),
        Some(&cookie),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::OK);

    let profile = body_json(get(&app, &format!("/profile/{}", user_id), Some(&cookie)).await).await;
    assert_eq!(profile["friends"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cannot_remove_another_users_friend_link() {
    let (app, _pool) = test_app().await;
    let (owner_cookie, _) = signup(&app, "owner@example.com", "pw123").await;
    let (_, friend_id) = signup(&app, "target@example.com", "pw123").await;
    let (intruder_cookie, _) = signup(&app, "intruder@example.com", "pw123").await;

    let added = post_json(
        &app,
        "/add-friend",
        json!({ "friend_id": friend_id }),
        Some(&owner_cookie),
    )
    .await;
    let link_id = body_json(added).await["friend"]["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/remove-friend/{}", link_id),
        json!({}),
        Some(&intruder_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner can still remove it.
    let response = post_json(
        &app,
        &format!("/remove-friend/{}", link_id),
        json!({}),
        Some(&owner_cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn adding_a_missing_user_is_not_found() {
    let (app, _pool) = test_app().await;
    let (cookie, _) = signup(&app, "alone@example.com", "pw123").await;

    let response = post_json(
        &app,
        "/add-friend",
        json!({ "friend_id": 9999 }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn self_friend_link_is_allowed() {
    let (app, _pool) = test_app().await;
    let (cookie, user_id) = signup(&app, "narciss@example.com", "pw123").await;

    let response = post_json(
        &app,
        "/add-friend",
        json!({ "friend_id": user_id }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["friend"]["friend_name"], "narciss");
}
