use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    db::SessionExt,
    error::{ErrorMessage, HttpError},
    models::{User, UserRole},
};

pub const SESSION_COOKIE: &str = "session_token";

/// Request-scoped authentication context
///
/// Inserted into request extensions after the session cookie resolves, so
/// handlers read the caller's identity and role from here instead of
/// re-querying credentials.
///
/// ```ignore
/// async fn my_handler(Extension(auth): Extension<SessionAuth>) {
///     // auth.user is the logged-in user
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionAuth {
    pub user: User,
}

/// Session authentication middleware
///
/// Reads the opaque session token from the cookie, resolves it to a user via
/// the server-side sessions table, and attaches the user to the request.
///
/// # Errors
/// Returns 401 Unauthorized if no cookie is present or the session row no
/// longer exists (logged out, or never valid).
pub async fn auth(
    cookie_jar: CookieJar,
    State(app_state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::SessionNotProvided.to_string()))?;

    let user = app_state
        .db_client
        .get_session_user(&token)
        .await
        .map_err(|e| {
            tracing::error!("DB error, resolving session: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let user =
        user.ok_or_else(|| HttpError::unauthorized(ErrorMessage::InvalidSession.to_string()))?;

    req.extensions_mut().insert(SessionAuth { user });

    Ok(next.run(req).await)
}

/// Role-based access control middleware
///
/// Must run after `auth`. Rejects with 403 Forbidden (never a redirect) when
/// the authenticated user lacks every required role, before any handler or
/// store operation runs.
pub async fn role_check(
    req: Request,
    next: Next,
    required_roles: Vec<UserRole>,
) -> Result<impl IntoResponse, HttpError> {
    let auth = req
        .extensions()
        .get::<SessionAuth>()
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string()))?;

    if !required_roles.contains(&auth.user.role) {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    Ok(next.run(req).await)
}
