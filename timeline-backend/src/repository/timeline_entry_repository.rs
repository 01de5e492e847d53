// src/repository/timeline_entry_repository.rs
use crate::domain::timeline_entry_model::{
    self, ActiveModel as TimelineEntryActiveModel, Entity as TimelineEntryEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// 新規コマの作成パラメータ
#[derive(Debug, Clone)]
pub struct NewTimelineEntry {
    pub teacher_id: Uuid,
    pub lesson_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub slots: i32,
}

pub struct TimelineEntryRepository {
    db: DbConn,
}

impl TimelineEntryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 講師のコマのうち開始時刻が [start, end] のもの
    pub async fn find_for_teacher_between(
        &self,
        teacher_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<timeline_entry_model::Model>, DbErr> {
        TimelineEntryEntity::find()
            .filter(timeline_entry_model::Column::TeacherId.eq(teacher_id))
            .filter(timeline_entry_model::Column::StartTime.between(start, end))
            .order_by_asc(timeline_entry_model::Column::StartTime)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        entry: NewTimelineEntry,
    ) -> Result<timeline_entry_model::Model, DbErr> {
        // id / created_at は ActiveModelBehavior::new で設定
        let mut model = TimelineEntryActiveModel::new();
        model.teacher_id = Set(entry.teacher_id);
        model.lesson_id = Set(entry.lesson_id);
        model.start_time = Set(entry.start_time);
        model.end_time = Set(entry.end_time);
        model.slots = Set(entry.slots);
        model.insert(&self.db).await
    }
}
