// src/domain/timeline_entry_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};

/// 講師のタイムライン上の1コマ。同じコマに予約されたクラスをまとめる
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timeline_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub lesson_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub slots: i32,
    pub taken_slots: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::TeacherId",
        to = "crate::domain::user_model::Column::Id"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "crate::domain::lesson_model::Entity",
        from = "Column::LessonId",
        to = "crate::domain::lesson_model::Column::Id"
    )]
    Lesson,
    #[sea_orm(has_many = "crate::domain::class_model::Entity")]
    Classes,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<crate::domain::lesson_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl Related<crate::domain::class_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            slots: Set(1),
            taken_slots: Set(0),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
