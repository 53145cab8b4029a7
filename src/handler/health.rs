use crate::{
    AppState,
    db::{FriendExt, HealthExt, UserExt},
    dtos::{
        DashboardStatsDto, FilterUserDto, HealthDataQueryDto, HealthTrackerResponseDto,
        ProfileResponseDto, RecordStatsDto, Response, SaveNotesDto, SaveNotesResponseDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::SessionAuth,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::instrument;
use validator::Validate;

/// Router for the health tracker, calendar drill-down, and profile endpoints
pub fn health_handler() -> Router<AppState> {
    Router::new()
        .route(
            "/health_tracker/{user_id}",
            get(health_tracker).post(record_stats),
        )
        .route("/get-health-data", get(get_health_data))
        .route("/save-notes", post(save_notes))
        .route("/profile/{user_id}", get(profile))
}

/// Dashboard view: the user plus their most recently inserted record.
///
/// A user with no records gets zeroed stats, never a 404 - the dashboard
/// renders either way.
#[instrument(skip(app_state))]
pub async fn health_tracker(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("User not found".to_string()))?;

    let latest = app_state
        .db_client
        .latest_stats(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, getting latest stats: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(HealthTrackerResponseDto {
        status: "success".to_string(),
        user: FilterUserDto::filter_user(&user),
        stats: DashboardStatsDto::from_record(latest),
    }))
}

/// Insert one daily metrics row
///
/// Appends unconditionally: a second submission for the same date adds a new
/// row, and "latest wins" reads pick it up. Absent fields are stored as NULL.
#[instrument(skip(app_state, body))]
pub async fn record_stats(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(body): Json<RecordStatsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid health stats input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    app_state
        .db_client
        .insert_stats(user_id, &body)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, inserting health stats: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    tracing::info!(user_id, "Health stats recorded");

    Ok((
        StatusCode::CREATED,
        Json(Response {
            status: "success",
            message: "Health data recorded.".to_string(),
        }),
    ))
}

/// Calendar drill-down: every record the session user logged on one date.
/// An empty array is the normal "nothing logged" answer.
#[instrument(skip(app_state, auth))]
pub async fn get_health_data(
    Extension(auth): Extension<SessionAuth>,
    State(app_state): State<AppState>,
    Query(query): Query<HealthDataQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let records = app_state
        .db_client
        .stats_for_date(auth.user.id, query.date)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %auth.user.id, date = %query.date, "DB error, getting stats for date: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(records))
}

/// Update the notes text on the records matching a date
///
/// Notes are scoped by date alone, not by (user, date); the calendar page
/// depends on that shape. Responds `{"success": false}` when no record
/// exists for the date.
#[instrument(skip(app_state, body))]
pub async fn save_notes(
    State(app_state): State<AppState>,
    Json(body): Json<SaveNotesDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(|e| {
        tracing::error!("Invalid save notes input: {}", e);
        HttpError::bad_request(e.to_string())
    })?;

    let rows = app_state
        .db_client
        .update_notes(body.date, &body.notes)
        .await
        .map_err(|e| {
            tracing::error!(date = %body.date, "DB error, updating notes: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(SaveNotesResponseDto { success: rows > 0 }))
}

/// Profile page data: the user, their full metrics history, and friends list
#[instrument(skip(app_state))]
pub async fn profile(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, getting user: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?
        .ok_or_else(|| HttpError::not_found("User not found".to_string()))?;

    let health_stats = app_state
        .db_client
        .stats_for_user(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, getting health history: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    let friends = app_state
        .db_client
        .friends_of(user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id, "DB error, getting friends: {}", e);
            HttpError::server_error(ErrorMessage::ServerError.to_string())
        })?;

    Ok(Json(ProfileResponseDto {
        status: "success".to_string(),
        user: FilterUserDto::filter_user(&user),
        health_stats,
        friends,
    }))
}
