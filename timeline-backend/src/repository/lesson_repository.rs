// src/repository/lesson_repository.rs
use crate::domain::lesson_model::{self, Entity as LessonEntity};
use crate::domain::lesson_type_model::{self, Entity as LessonTypeEntity};
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct LessonRepository {
    db: DbConn,
}

impl LessonRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<lesson_model::Model>, DbErr> {
        LessonEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<lesson_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        LessonEntity::find()
            .filter(lesson_model::Column::Id.is_in(ids))
            .all(&self.db)
            .await
    }

    pub async fn find_type(&self, id: i32) -> Result<Option<lesson_type_model::Model>, DbErr> {
        LessonTypeEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_type(&self, lesson_type_id: i32) -> Result<Vec<lesson_model::Model>, DbErr> {
        LessonEntity::find()
            .filter(lesson_model::Column::LessonTypeId.eq(lesson_type_id))
            .order_by_asc(lesson_model::Column::Name)
            .all(&self.db)
            .await
    }
}
