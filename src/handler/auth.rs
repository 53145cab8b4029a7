use crate::{
    AppState,
    db::{SessionExt, UserExt},
    dtos::{AuthResponseDto, FilterUserDto, LoginUserDto, RegisterUserDto, Response},
    error::{ErrorMessage, HttpError},
    middleware::SESSION_COOKIE,
    utils::password,
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::instrument;
use validator::Validate;

/// Router for authentication endpoints
pub fn auth_handler() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .build()
}

/// Create a new account and start a session
///
/// The username defaults to the email local-part when the client does not
/// supply one. A duplicate email is a 409; the first account is untouched.
#[instrument(skip(app_state, body), fields(email = %body.email))]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid signup input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let username = match &body.username {
        Some(name) if !name.is_empty() => name.clone(),
        _ => body
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let hash_password = password::hash(&body.password).map_err(|e| {
        tracing::error!("Password hashing error: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let result = app_state
        .db_client
        .save_user(&username, &body.email, &hash_password)
        .await;

    let user = match result {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::error!("DB error, saving user, unique violation: {}", db_err);
            return Err(HttpError::unique_constraint_violation(
                ErrorMessage::EmailExists.to_string(),
            ));
        }
        Err(e) => {
            tracing::error!("DB error, saving user: {}", e);
            return Err(HttpError::server_error(
                ErrorMessage::ServerError.to_string(),
            ));
        }
    };

    let session = app_state
        .db_client
        .create_session(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, "DB error, creating session: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let cookie = session_cookie(&session.token, app_state.env.cookie_secure);

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie.to_string().parse().unwrap());

    tracing::info!(user_id = %user.id, email = %body.email, "Signup successful");

    let response = (
        StatusCode::CREATED,
        Json(AuthResponseDto {
            status: "success".to_string(),
            user: FilterUserDto::filter_user(&user),
        }),
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}

/// Log in with email and password
///
/// Unknown email and wrong password return the same 401 response so callers
/// cannot probe which emails are registered.
#[instrument(skip(app_state, body), fields(email = %body.email))]
pub async fn login(
    State(app_state): State<AppState>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid login input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| {
            tracing::error!("DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let user = result.ok_or_else(|| {
        tracing::error!("Login failed: user not found");
        HttpError::unauthorized(ErrorMessage::InvalidCredentials.to_string())
    })?;

    let password_matched = password::compare(&body.password, &user.password).map_err(|e| {
        tracing::error!("Password error: {}", e);
        HttpError::unauthorized(ErrorMessage::InvalidCredentials.to_string())
    })?;

    if !password_matched {
        tracing::error!("Login failed: password mismatch");
        return Err(HttpError::unauthorized(
            ErrorMessage::InvalidCredentials.to_string(),
        ));
    }

    let session = app_state
        .db_client
        .create_session(user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user.id, "DB error, creating session: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let cookie = session_cookie(&session.token, app_state.env.cookie_secure);

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie.to_string().parse().unwrap());

    tracing::info!(user_id = %user.id, "Login successful");

    let response = Json(AuthResponseDto {
        status: "success".to_string(),
        user: FilterUserDto::filter_user(&user),
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}

/// Destroy the server-side session and clear the cookie
#[instrument(skip(app_state, cookie_jar))]
pub async fn logout(
    cookie_jar: CookieJar,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(cookie) = cookie_jar.get(SESSION_COOKIE) {
        app_state
            .db_client
            .delete_session(cookie.value())
            .await
            .map_err(|e| {
                tracing::error!("DB error, deleting session: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            })?;
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, removal.to_string().parse().unwrap());

    tracing::info!("Logout successful");

    let response = Json(Response {
        status: "success",
        message: "Logged out.".to_string(),
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}
