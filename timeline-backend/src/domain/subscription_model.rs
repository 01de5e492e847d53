// src/domain/subscription_model.rs
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

/// 購入済みレッスンパッケージ。`is_fully_used` は残りコマが無いことを示す
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub buy_price: Decimal,
    pub buy_price_currency: String,
    pub is_fully_used: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::customer_model::Entity",
        from = "Column::CustomerId",
        to = "crate::domain::customer_model::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "crate::domain::class_model::Entity")]
    Classes,
}

impl Related<crate::domain::customer_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
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
            buy_price_currency: Set("USD".to_string()),
            is_fully_used: Set(false),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
