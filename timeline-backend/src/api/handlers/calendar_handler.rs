// src/api/handlers/calendar_handler.rs
use crate::api::dto::calendar_dto::{
    AvailableLessonsQuery, CalendarEntryDto, CalendarPageDto, CalendarRangeQuery,
    CreateTimelineEntryDto, LessonDto,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::service::calendar_service::CalendarService;
use crate::types::{parse_calendar_bound, ApiResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tracing::info;
use validator::Validate;

fn parse_bound(
    field: &str,
    value: Option<&str>,
    default: DateTime<Utc>,
) -> Result<DateTime<Utc>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => parse_calendar_bound(raw)
            .ok_or_else(|| format!("{}: invalid date '{}'", field, raw)),
    }
}

pub async fn calendar_page_handler(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<CalendarPageDto>> {
    let page = app_state.calendar_service.calendar_page(&username).await?;
    Ok(ApiResponse::success(page))
}

pub async fn create_entry_handler(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<CreateTimelineEntryDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    info!(
        username = %username,
        lesson_id = %payload.lesson_id,
        start_time = %payload.start_time,
        "Creating timeline entry"
    );

    let entry = app_state
        .calendar_service
        .create_entry(&username, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(entry)))
}

pub async fn calendar_json_handler(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<CalendarRangeQuery>,
) -> AppResult<Json<Vec<CalendarEntryDto>>> {
    let mut errors = Vec::new();

    let start = parse_bound(
        "start",
        query.start.as_deref(),
        CalendarService::default_range_start(),
    )
    .map_err(|e| errors.push(e))
    .ok();
    let end = parse_bound(
        "end",
        query.end.as_deref(),
        CalendarService::default_range_end(),
    )
    .map_err(|e| errors.push(e))
    .ok();

    let (Some(start), Some(end)) = (start, end) else {
        return Err(AppError::ValidationErrors(errors));
    };

    let entries = app_state
        .calendar_service
        .entries_json(&username, start, end)
        .await?;

    Ok(Json(entries))
}

pub async fn available_lessons_handler(
    State(app_state): State<AppState>,
    Path(_username): Path<String>,
    Query(query): Query<AvailableLessonsQuery>,
) -> AppResult<Json<Vec<LessonDto>>> {
    let lesson_type_id = query
        .lesson_id
        .ok_or_else(|| AppError::BadRequest("lesson_id is required".to_string()))?;

    let lessons = app_state
        .calendar_service
        .available_lessons(lesson_type_id)
        .await?;

    Ok(Json(lessons))
}

// --- Router Setup ---
pub fn calendar_router(app_state: AppState) -> Router {
    Router::new()
        .route("/timeline/{username}", get(calendar_page_handler))
        .route("/timeline/{username}/create", post(create_entry_handler))
        .route("/timeline/{username}/calendar.json", get(calendar_json_handler))
        .route(
            "/timeline/{username}/available_lessons.json",
            get(available_lessons_handler),
        )
        .with_state(app_state)
}
