use crate::{
    AppState,
    db::ArticleExt,
    dtos::{ArticleListResponseDto, ArticleResponseDto, PublishArticleDto, Response},
    error::{ErrorMessage, HttpError},
    models::Category,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::str::FromStr;
use tracing::instrument;
use validator::Validate;

/// Router for the public article catalog
pub fn contents_handler() -> Router<AppState> {
    Router::new()
        .route("/contents/{category}", get(list_articles))
        .route("/article/{article_id}", get(get_article))
}

/// Router for the admin publishing endpoints; routes.rs layers the session
/// and role middleware on top.
pub fn admin_handler() -> Router<AppState> {
    Router::new()
        .route("/home", get(admin_home))
        .route("/publish", post(publish_article))
        .route("/delete/{article_id}", post(delete_article))
}

/// Articles in one category, newest first
#[instrument(skip(app_state))]
pub async fn list_articles(
    State(app_state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let category = Category::from_str(&category)
        .map_err(|_| HttpError::not_found(format!("Unknown category: {}", category)))?;

    let articles = app_state
        .db_client
        .list_articles(category)
        .await
        .map_err(|e| {
            tracing::error!(%category, "DB error, listing articles: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(ArticleListResponseDto {
        status: "success".to_string(),
        articles,
    }))
}

#[instrument(skip(app_state))]
pub async fn get_article(
    State(app_state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let article = app_state
        .db_client
        .get_article(article_id)
        .await
        .map_err(|e| {
            tracing::error!(article_id, "DB error, getting article: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("Article not found".to_string()))?;

    Ok(Json(ArticleResponseDto {
        status: "success".to_string(),
        article,
    }))
}

/// Admin home: every article across categories, newest first
#[instrument(skip(app_state))]
pub async fn admin_home(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    let articles = app_state.db_client.list_all_articles().await.map_err(|e| {
        tracing::error!("DB error, listing all articles: {}", e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })?;

    Ok(Json(ArticleListResponseDto {
        status: "success".to_string(),
        articles,
    }))
}

/// Publish a new article (admin only, enforced by the role middleware)
#[instrument(skip(app_state, body))]
pub async fn publish_article(
    State(app_state): State<AppState>,
    Json(body): Json<PublishArticleDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid article input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let category = Category::from_str(&body.category)
        .map_err(|_| HttpError::bad_request(format!("Unknown category: {}", body.category)))?;

    let article = app_state
        .db_client
        .create_article(&body.title, &body.content, category)
        .await
        .map_err(|e| {
            tracing::error!(%category, "DB error, creating article: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(article_id = article.id, %category, "Article published");

    Ok((
        StatusCode::CREATED,
        Json(ArticleResponseDto {
            status: "success".to_string(),
            article,
        }),
    ))
}

/// Delete an article by id (admin only)
#[instrument(skip(app_state))]
pub async fn delete_article(
    State(app_state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let rows = app_state
        .db_client
        .delete_article(article_id)
        .await
        .map_err(|e| {
            tracing::error!(article_id, "DB error, deleting article: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    if rows == 0 {
        return Err(HttpError::not_found("Article not found".to_string()));
    }

    tracing::info!(article_id, "Article deleted");

    Ok(Json(Response {
        status: "success",
        message: "Article deleted.".to_string(),
    }))
}
