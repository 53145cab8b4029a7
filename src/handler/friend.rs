use crate::{
    AppState,
    db::{FriendExt, UserExt},
    dtos::{AddFriendDto, FriendResponseDto, Response, SearchFriendDto, SearchFriendResponseDto},
    error::{ErrorMessage, HttpError},
    middleware::SessionAuth,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::instrument;
use validator::Validate;

/// Router for the friend finder and friend list endpoints
pub fn friend_handler() -> Router<AppState> {
    Router::new()
        .route("/search-friend", post(search_friend))
        .route("/add-friend", post(add_friend))
        .route("/remove-friend/{link_id}", post(remove_friend))
}

/// Case-insensitive substring search over usernames
#[instrument(skip(app_state, body))]
pub async fn search_friend(
    State(app_state): State<AppState>,
    Json(body): Json<SearchFriendDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid friend search input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let results = app_state
        .db_client
        .search_users(&body.username)
        .await
        .map_err(|e| {
            tracing::error!(query = %body.username, "DB error, searching users: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(SearchFriendResponseDto { results }))
}

/// Create a directional friend link for the session user
///
/// The friend's username is captured into the link as its display name.
/// Linking to yourself is allowed.
#[instrument(skip(app_state, auth, body))]
pub async fn add_friend(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Json(body): Json<AddFriendDto>,
) -> Result<impl IntoResponse, HttpError> {
    let friend = app_state
        .db_client
        .get_user(Some(body.friend_id), None)
        .await
        .map_err(|e| {
            tracing::error!(friend_id = body.friend_id, "DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("User not found".to_string()))?;

    let link = app_state
        .db_client
        .add_friend(
            auth.user.id,
            friend.id,
            &friend.username,
            body.message.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(user_id = %auth.user.id, friend_id = friend.id, "DB error, adding friend: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(user_id = %auth.user.id, friend_id = friend.id, "Friend added");

    Ok((
        StatusCode::CREATED,
        Json(FriendResponseDto {
            status: "success".to_string(),
            friend: link,
        }),
    ))
}

/// Remove a friend link; the link must belong to the session user
#[instrument(skip(app_state, auth))]
pub async fn remove_friend(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path(link_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let rows = app_state
        .db_client
        .remove_friend(auth.user.id, link_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %auth.user.id, link_id, "DB error, removing friend: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if rows == 0 {
        return Err(HttpError::not_found("Friend link not found".to_string()));
    }

    Ok(Json(Response {
        status: "success",
        message: "Friend removed.".to_string(),
    }))
}
