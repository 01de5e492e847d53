// src/api/dto/calendar_dto.rs
use crate::domain::lesson_model;
use crate::domain::timeline_entry_model;
use crate::domain::user_model;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Validate)]
#[validate(schema(function = validate_entry_period, skip_on_field_errors = false))]
pub struct CreateTimelineEntryDto {
    pub lesson_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    #[validate(range(min = 1, max = 100, message = "Slots must be between 1 and 100"))]
    pub slots: Option<i32>,
}

fn validate_entry_period(dto: &CreateTimelineEntryDto) -> Result<(), ValidationError> {
    if dto.end_time <= dto.start_time {
        let mut error = ValidationError::new("end_time_before_start_time");
        error.message = Some("End time must be after start time".into());
        return Err(error);
    }
    Ok(())
}

/// calendar.json のクエリ。値は YYYY-MM-DD か RFC 3339
#[derive(Deserialize, Debug, Default)]
pub struct CalendarRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AvailableLessonsQuery {
    /// レッスン種別ID
    pub lesson_id: Option<i32>,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarEntryDto {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub slots: i32,
    pub taken_slots: i32,
    pub lesson_id: Uuid,
}

impl CalendarEntryDto {
    pub fn from_entry(entry: timeline_entry_model::Model, title: String) -> Self {
        Self {
            id: entry.id,
            title,
            start: entry.start_time,
            end: entry.end_time,
            slots: entry.slots,
            taken_slots: entry.taken_slots,
            lesson_id: entry.lesson_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LessonDto {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub slots: i32,
    pub host_id: Option<Uuid>,
}

impl From<lesson_model::Model> for LessonDto {
    fn from(lesson: lesson_model::Model) -> Self {
        Self {
            id: lesson.id,
            name: lesson.name,
            duration_minutes: lesson.duration_minutes,
            slots: lesson.slots,
            host_id: lesson.host_id,
        }
    }
}

/// カレンダーページの表示に必要な情報
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CalendarPageDto {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub calendar_url: String,
    pub create_url: String,
}

impl From<user_model::Model> for CalendarPageDto {
    fn from(user: user_model::Model) -> Self {
        Self {
            calendar_url: format!("/timeline/{}/calendar.json", user.username),
            create_url: format!("/timeline/{}/create", user.username),
            full_name: user.full_name(),
            user_id: user.id,
            username: user.username,
        }
    }
}
