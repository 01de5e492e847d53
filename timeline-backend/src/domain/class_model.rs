// src/domain/class_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 受講者が購入した1回分のクラス。`timeline_id` はスケジュール済みのときだけ入る
///
/// 開始前通知フラグは false → true の一方向にしか変化しない。
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub lesson_id: Uuid,
    #[sea_orm(nullable)]
    pub subscription_id: Option<Uuid>,
    #[sea_orm(nullable)]
    pub timeline_id: Option<Uuid>,
    pub pre_start_notifications_sent_to_teacher: bool,
    pub pre_start_notifications_sent_to_student: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::customer_model::Entity",
        from = "Column::CustomerId",
        to = "crate::domain::customer_model::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "crate::domain::subscription_model::Entity",
        from = "Column::SubscriptionId",
        to = "crate::domain::subscription_model::Column::Id"
    )]
    Subscription,
    #[sea_orm(
        belongs_to = "crate::domain::timeline_entry_model::Entity",
        from = "Column::TimelineId",
        to = "crate::domain::timeline_entry_model::Column::Id"
    )]
    TimelineEntry,
}

impl Related<crate::domain::customer_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<crate::domain::subscription_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl Related<crate::domain::timeline_entry_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimelineEntry.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            pre_start_notifications_sent_to_teacher: Set(false),
            pre_start_notifications_sent_to_student: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}
