use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    error::HttpError,
    handler::{
        article::{admin_handler, contents_handler},
        auth::auth_handler,
        feed::feed_handler,
        friend::friend_handler,
        health::health_handler,
    },
    middleware::{auth, role_check},
    models::UserRole,
};

async fn admin_only(req: Request, next: Next) -> Result<impl IntoResponse, HttpError> {
    role_check(req, next, vec![UserRole::Admin]).await
}

pub fn create_router(app_state: AppState) -> Router {
    // Everything except signup/login/logout and the public article catalog
    // sits behind the session middleware.
    let protected = Router::new()
        .merge(health_handler())
        .merge(feed_handler())
        .merge(friend_handler())
        .layer(middleware::from_fn_with_state(app_state.clone(), auth));

    // Admin routes additionally require the admin role; auth runs first
    // (outermost), then the role check, then the handler.
    let admin = admin_handler()
        .layer(middleware::from_fn(admin_only))
        .layer(middleware::from_fn_with_state(app_state.clone(), auth));

    Router::new()
        .merge(auth_handler())
        .merge(contents_handler())
        .merge(protected)
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
