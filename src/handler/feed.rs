use crate::{
    AppState,
    db::{LikeOutcome, PostExt},
    dtos::{
        AddCommentDto, CreatePostDto, CreatePostResponseDto, FeedResponseDto, LikeResponseDto,
        PostWithCommentsDto, Response,
    },
    error::{ErrorMessage, HttpError},
    middleware::SessionAuth,
    models::{Category, FeedScope},
};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::str::FromStr;
use tracing::instrument;
use validator::Validate;

/// Router for the personal feed and the six community feeds
///
/// Both flavors run through the same scope-parameterized core; the community
/// routes only add category parsing on top.
pub fn feed_handler() -> Router<AppState> {
    Router::new()
        .route("/posting", get(list_personal).post(create_personal))
        .route("/post/{post_id}/comment", post(comment_personal))
        .route("/post/{post_id}/like", post(like_personal))
        .route(
            "/communities/{category}",
            get(list_community).post(create_community),
        )
        .route(
            "/communities/{category}/post/{post_id}/comment",
            post(comment_community),
        )
        .route(
            "/communities/{category}/post/{post_id}/like",
            post(like_community),
        )
}

fn parse_category(raw: &str) -> Result<Category, HttpError> {
    Category::from_str(raw)
        .map_err(|_| HttpError::not_found(format!("Unknown community category: {}", raw)))
}

// ============================================================================
// Scope-parameterized core
// ============================================================================

/// Posts in the scope, newest first, each with its comments attached.
async fn list_feed(
    app_state: &AppState,
    scope: FeedScope,
) -> Result<FeedResponseDto, HttpError> {
    let posts = app_state.db_client.list_posts(scope).await.map_err(|e| {
        tracing::error!(?scope, "DB error, listing posts: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    let mut with_comments = Vec::with_capacity(posts.len());
    for post in posts {
        let comments = app_state
            .db_client
            .comments_for_post(scope, post.post_id)
            .await
            .map_err(|e| {
                tracing::error!(?scope, post_id = post.post_id, "DB error, listing comments: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            })?;
        with_comments.push(PostWithCommentsDto { post, comments });
    }

    let category = match scope {
        FeedScope::Personal => None,
        FeedScope::Community(category) => Some(category),
    };

    Ok(FeedResponseDto {
        status: "success".to_string(),
        category,
        posts: with_comments,
    })
}

async fn create_in_feed(
    app_state: &AppState,
    auth: &SessionAuth,
    scope: FeedScope,
    body: CreatePostDto,
) -> Result<CreatePostResponseDto, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid post input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let post = app_state
        .db_client
        .create_post(
            scope,
            auth.user.id,
            &auth.user.username,
            &body.title,
            &body.content,
            body.image_url.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(?scope, user_id = %auth.user.id, "DB error, creating post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(?scope, post_id = post.post_id, "Post created");

    Ok(CreatePostResponseDto {
        status: "success".to_string(),
        post_id: post.post_id,
    })
}

async fn comment_in_feed(
    app_state: &AppState,
    auth: &SessionAuth,
    scope: FeedScope,
    post_id: i64,
    body: AddCommentDto,
) -> Result<Response, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid comment input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let post = app_state
        .db_client
        .get_post(scope, post_id)
        .await
        .map_err(|e| {
            tracing::error!(?scope, post_id, "DB error, getting post: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if post.is_none() {
        return Err(HttpError::not_found("Post not found".to_string()));
    }

    let commenter_name = body
        .commenter_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&auth.user.username);

    app_state
        .db_client
        .add_comment(scope, post_id, commenter_name, &body.comment_text)
        .await
        .map_err(|e| {
            tracing::error!(?scope, post_id, "DB error, adding comment: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Response {
        status: "success",
        message: "Comment added.".to_string(),
    })
}

async fn like_in_feed(
    app_state: &AppState,
    auth: &SessionAuth,
    scope: FeedScope,
    post_id: i64,
) -> Result<LikeResponseDto, HttpError> {
    let outcome = app_state
        .db_client
        .like_post(scope, post_id, auth.user.id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => HttpError::not_found("Post not found".to_string()),
            e => {
                tracing::error!(?scope, post_id, user_id = %auth.user.id, "DB error, liking post: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        })?;

    match outcome {
        LikeOutcome::Liked { likes } => Ok(LikeResponseDto {
            status: "success".to_string(),
            likes,
        }),
        LikeOutcome::AlreadyLiked => Err(HttpError::unique_constraint_violation(
            ErrorMessage::AlreadyLiked.to_string(),
        )),
    }
}

// ============================================================================
// Personal feed routes
// ============================================================================

#[instrument(skip(app_state))]
pub async fn list_personal(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let feed = list_feed(&app_state, FeedScope::Personal).await?;
    Ok(Json(feed))
}

#[instrument(skip(app_state, auth, body))]
pub async fn create_personal(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Json(body): Json<CreatePostDto>,
) -> Result<impl IntoResponse, HttpError> {
    let created = create_in_feed(&app_state, &auth, FeedScope::Personal, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(app_state, auth, body))]
pub async fn comment_personal(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(body): Json<AddCommentDto>,
) -> Result<impl IntoResponse, HttpError> {
    let response = comment_in_feed(&app_state, &auth, FeedScope::Personal, post_id, body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, auth))]
pub async fn like_personal(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let response = like_in_feed(&app_state, &auth, FeedScope::Personal, post_id).await?;
    Ok(Json(response))
}

// ============================================================================
// Community feed routes
// ============================================================================

#[instrument(skip(app_state))]
pub async fn list_community(
    State(app_state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let category = parse_category(&category)?;
    let feed = list_feed(&app_state, FeedScope::Community(category)).await?;
    Ok(Json(feed))
}

#[instrument(skip(app_state, auth, body))]
pub async fn create_community(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path(category): Path<String>,
    Json(body): Json<CreatePostDto>,
) -> Result<impl IntoResponse, HttpError> {
    let category = parse_category(&category)?;
    let created = create_in_feed(&app_state, &auth, FeedScope::Community(category), body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(app_state, auth, body))]
pub async fn comment_community(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path((category, post_id)): Path<(String, i64)>,
    Json(body): Json<AddCommentDto>,
) -> Result<impl IntoResponse, HttpError> {
    let category = parse_category(&category)?;
    let response =
        comment_in_feed(&app_state, &auth, FeedScope::Community(category), post_id, body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(app_state, auth))]
pub async fn like_community(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Path((category, post_id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, HttpError> {
    let category = parse_category(&category)?;
    let response = like_in_feed(&app_state, &auth, FeedScope::Community(category), post_id).await?;
    Ok(Json(response))
}
