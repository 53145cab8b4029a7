mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

async fn admin_session(app: &axum::Router, pool: &sqlx::Pool<sqlx::Sqlite>) -> String {
    let (_, user_id) = signup(app, "admin@example.com", "admin-pass").await;
    promote_to_admin(pool, user_id).await;
    // A fresh login so the session reflects the new role.
    login(app, "admin@example.com", "admin-pass").await
}

#[tokio::test]
async fn admin_publishes_and_readers_see_the_article() {
    let (app, pool) = test_app().await;
    let cookie = admin_session(&app, &pool).await;

    let published = post_json(
        &app,
        "/admin/publish",
        json!({
            "title": "Couch to 5k",
            "content": "Week one: walk briskly.",
            "category": "fitness"
        }),
        Some(&cookie),
    )
    .await;
    assert_eq!(published.status(), StatusCode::CREATED);
    let article_id = body_json(published).await["article"]["id"].as_i64().unwrap();

    // The catalog is public, no session needed.
    let listing = get(&app, "/contents/fitness", None).await;
    assert_eq!(listing.status(), StatusCode::OK);
    let body = body_json(listing).await;
    assert_eq!(body["articles"].as_array().unwrap().len(), 1);
    assert_eq!(body["articles"][0]["title"], "Couch to 5k");
    assert_eq!(body["articles"][0]["category"], "fitness");

    let single = get(&app, &format!("/article/{}", article_id), None).await;
    assert_eq!(single.status(), StatusCode::OK);
    assert_eq!(body_json(single).await["article"]["id"], article_id);

    // Other categories stay empty.
    let other = body_json(get(&app, "/contents/mental-health", None).await).await;
    assert_eq!(other["articles"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn admin_home_lists_every_category() {
    let (app, pool) = test_app().await;
    let cookie = admin_session(&app, &pool).await;

    for (category, title) in [
        ("mental-health", "Breathing basics"),
        ("fitness", "Starting strength"),
    ] {
        post_json(
            &app,
            "/admin/publish",
            json!({ "title": title, "content": "...", "category": category }),
            Some(&cookie),
        )
        .await;
    }

    let home = get(&app, "/admin/home", Some(&cookie)).await;
    assert_eq!(home.status(), StatusCode::OK);
    let body = body_json(home).await;
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_deletes_an_article() {
    let (app, pool) = test_app().await;
    let cookie = admin_session(&app, &pool).await;

    let published = post_json(
        &app,
        "/admin/publish",
        json!({ "title": "Gone soon", "content": "...", "category": "medicine" }),
        Some(&cookie),
    )
    .await;
    let article_id = body_json(published).await["article"]["id"].as_i64().unwrap();

    let deleted = post_json(
        &app,
        &format!("/admin/delete/{}", article_id),
        json!({}),
        Some(&cookie),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let gone = get(&app, &format!("/article/{}", article_id), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let again = post_json(
        &app,
        &format!("/admin/delete/{}", article_id),
        json!({}),
        Some(&cookie),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_admin_is_forbidden_and_nothing_is_published() {
    let (app, pool) = test_app().await;
    let (cookie, _) = signup(&app, "regular@example.com", "pw123").await;

    let response = post_json(
        &app,
        "/admin/publish",
        json!({ "title": "Sneaky", "content": "...", "category": "fitness" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let home = get(&app, "/admin/home", Some(&cookie)).await;
    assert_eq!(home.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let (app, _pool) = test_app().await;

    let response = get(&app, "/admin/home", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn publish_rejects_unknown_category() {
    let (app, pool) = test_app().await;
    let cookie = admin_session(&app, &pool).await;

    let response = post_json(
        &app,
        "/admin/publish",
        json!({ "title": "Nope", "content": "...", "category": "extreme-ironing" }),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_rejects_unknown_category() {
    let (app, _pool) = test_app().await;

    let response = get(&app, "/contents/extreme-ironing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
