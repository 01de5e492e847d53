// src/service/calendar_service.rs

use crate::api::dto::calendar_dto::{
    CalendarEntryDto, CalendarPageDto, CreateTimelineEntryDto, LessonDto,
};
use crate::db::DbPool;
use crate::domain::user_model;
use crate::error::{AppError, AppResult};
use crate::repository::lesson_repository::LessonRepository;
use crate::repository::timeline_entry_repository::{NewTimelineEntry, TimelineEntryRepository};
use crate::repository::user_repository::UserRepository;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub struct CalendarService {
    user_repo: Arc<UserRepository>,
    entry_repo: Arc<TimelineEntryRepository>,
    lesson_repo: Arc<LessonRepository>,
}

impl CalendarService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            entry_repo: Arc::new(TimelineEntryRepository::new(db_pool.clone())),
            lesson_repo: Arc::new(LessonRepository::new(db_pool)),
        }
    }

    /// 範囲指定が無いときの既定の下限
    pub fn default_range_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// 範囲指定が無いときの既定の上限
    pub fn default_range_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    async fn find_user(&self, username: &str) -> AppResult<user_model::Model> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    pub async fn calendar_page(&self, username: &str) -> AppResult<CalendarPageDto> {
        let user = self.find_user(username).await?;
        Ok(CalendarPageDto::from(user))
    }

    pub async fn create_entry(
        &self,
        username: &str,
        payload: CreateTimelineEntryDto,
    ) -> AppResult<CalendarEntryDto> {
        let teacher = self.find_user(username).await?;

        let lesson = self
            .lesson_repo
            .find_by_id(payload.lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::ValidationErrors(vec![format!(
                    "lesson_id: lesson {} does not exist",
                    payload.lesson_id
                )])
            })?;

        let entry = self
            .entry_repo
            .create(NewTimelineEntry {
                teacher_id: teacher.id,
                lesson_id: lesson.id,
                start_time: payload.start_time,
                end_time: payload.end_time,
                slots: payload.slots.unwrap_or(lesson.slots),
            })
            .await?;

        info!(
            teacher_id = %teacher.id,
            timeline_id = %entry.id,
            lesson_id = %lesson.id,
            start_time = %entry.start_time,
            "Timeline entry created"
        );

        Ok(CalendarEntryDto::from_entry(entry, lesson.name))
    }

    /// 講師のコマのうち開始時刻が [start, end] のもの。1件も無ければ NotFound
    pub async fn entries_json(
        &self,
        username: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CalendarEntryDto>> {
        let teacher = self.find_user(username).await?;

        let entries = self
            .entry_repo
            .find_for_teacher_between(teacher.id, start, end)
            .await?;

        if entries.is_empty() {
            return Err(AppError::NotFound(format!(
                "No timeline entries for '{}' between {} and {}",
                username, start, end
            )));
        }

        let mut lesson_ids: Vec<_> = entries.iter().map(|entry| entry.lesson_id).collect();
        lesson_ids.sort();
        lesson_ids.dedup();

        let titles: HashMap<_, _> = self
            .lesson_repo
            .find_by_ids(lesson_ids)
            .await?
            .into_iter()
            .map(|lesson| (lesson.id, lesson.name))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let title = titles.get(&entry.lesson_id).cloned().unwrap_or_default();
                CalendarEntryDto::from_entry(entry, title)
            })
            .collect())
    }

    /// レッスン種別に属するレッスン一覧。種別が無いか空なら NotFound
    pub async fn available_lessons(&self, lesson_type_id: i32) -> AppResult<Vec<LessonDto>> {
        self.lesson_repo
            .find_type(lesson_type_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Lesson type {} not found", lesson_type_id))
            })?;

        let lessons = self.lesson_repo.find_by_type(lesson_type_id).await?;
        if lessons.is_empty() {
            return Err(AppError::NotFound(format!(
                "No lessons for lesson type {}",
                lesson_type_id
            )));
        }

        Ok(lessons.into_iter().map(LessonDto::from).collect())
    }
}
