// src/domain/lesson_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lesson_type_id: i32,
    #[sea_orm(nullable)]
    pub host_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    pub slots: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::lesson_type_model::Entity",
        from = "Column::LessonTypeId",
        to = "crate::domain::lesson_type_model::Column::Id"
    )]
    LessonType,
}

impl Related<crate::domain::lesson_type_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LessonType.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
