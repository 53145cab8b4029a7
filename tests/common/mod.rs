//! Shared helper functions for integration tests
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{self, Request, Response},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tower::ServiceExt;

use health_tracker_backend::{AppState, config::Config, db::DBClient, routes::create_router};

/// Build the real router against a fresh in-memory SQLite database.
///
/// One connection keeps every request on the same in-memory database (each
/// sqlite memory connection is otherwise its own database). The pool is
/// returned too, for tests that need to assert on raw rows or promote a user
/// to admin.
pub async fn test_app() -> (Router, Pool<Sqlite>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    let db_client = DBClient::new(pool.clone());
    db_client.init_schema().await.expect("schema init failed");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        frontend_url: "http://localhost:3000".to_string(),
        cookie_secure: false,
    };

    let app = create_router(AppState {
        env: Arc::new(config),
        db_client,
    });

    (app, pool)
}

pub async fn send_json(
    app: &Router,
    method: http::Method,
    uri: &str,
    body: Value,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");

    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value, cookie: Option<&str>) -> Response<Body> {
    send_json(app, http::Method::POST, uri, body, cookie).await
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(http::Method::GET).uri(uri);

    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Extract the `session_token=...` pair from a Set-Cookie header.
pub fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(http::header::SET_COOKIE)
        .expect("expected a Set-Cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

/// Sign up a fresh user; returns (session cookie, user id).
pub async fn signup(app: &Router, email: &str, password: &str) -> (String, i64) {
    let response = post_json(
        app,
        "/signup",
        serde_json::json!({ "email": email, "password": password }),
        None,
    )
    .await;

    assert_eq!(
        response.status(),
        http::StatusCode::CREATED,
        "signup failed for {}",
        email
    );
    let cookie = session_cookie(&response);
    let body = body_json(response).await;
    let user_id = body["user"]["id"].as_i64().unwrap();

    (cookie, user_id)
}

/// Log in an existing user; returns the session cookie.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/login",
        serde_json::json!({ "email": email, "password": password }),
        None,
    )
    .await;

    assert_eq!(response.status(), http::StatusCode::OK, "login failed for {}", email);
    session_cookie(&response)
}

/// Flip a user's role to admin, bypassing the API on purpose: there is no
/// promotion endpoint, admins are provisioned directly.
pub async fn promote_to_admin(pool: &Pool<Sqlite>, user_id: i64) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}
