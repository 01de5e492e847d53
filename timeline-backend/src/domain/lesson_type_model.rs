// src/domain/lesson_type_model.rs
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// レッスン種別（app_label + model で一意）
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub app_label: String,
    pub model: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::lesson_model::Entity")]
    Lessons,
}

impl Related<crate::domain::lesson_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
