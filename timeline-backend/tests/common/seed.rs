// tests/common/seed.rs
//! 実 PostgreSQL 向けのテストデータ投入

use chrono::{DateTime, Duration, Utc};
use sea_orm::prelude::Decimal;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, Set};
use timeline_backend::domain::{
    class_model, customer_model, lesson_model, lesson_type_model, subscription_model, user_model,
};
use timeline_backend::repository::timeline_entry_repository::{
    NewTimelineEntry, TimelineEntryRepository,
};
use uuid::Uuid;

pub const TEACHER_USERNAME: &str = "teacher";

/// 講師・レッスン種別・レッスンを1件ずつ作った状態
pub struct Seed<'a> {
    db: &'a DatabaseConnection,
    pub teacher: user_model::Model,
    pub teacher_id: Uuid,
    pub lesson_type_id: i32,
    pub lesson_id: Uuid,
}

impl<'a> Seed<'a> {
    pub async fn new(db: &'a DatabaseConnection) -> Self {
        let teacher = insert_user(db, TEACHER_USERNAME).await;

        let lesson_type = lesson_type_model::ActiveModel {
            app_label: Set("lessons".to_string()),
            model: Set("ordinarylesson".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let mut lesson = lesson_model::ActiveModel::new();
        lesson.lesson_type_id = Set(lesson_type.id);
        lesson.host_id = Set(Some(teacher.id));
        lesson.name = Set("Ordinary lesson".to_string());
        lesson.duration_minutes = Set(30);
        lesson.slots = Set(1);
        let lesson = lesson.insert(db).await.unwrap();

        Self {
            db,
            teacher_id: teacher.id,
            teacher,
            lesson_type_id: lesson_type.id,
            lesson_id: lesson.id,
        }
    }

    pub async fn customer(&self, username: &str, timezone: &str) -> Uuid {
        let user = insert_user(self.db, username).await;
        let mut customer = customer_model::ActiveModel::new();
        customer.user_id = Set(user.id);
        customer.timezone = Set(timezone.to_string());
        customer.insert(self.db).await.unwrap().id
    }

    pub async fn subscription(&self, customer_id: Uuid, is_fully_used: bool) -> Uuid {
        let mut subscription = subscription_model::ActiveModel::new();
        subscription.customer_id = Set(customer_id);
        subscription.buy_price = Set(Decimal::new(1500, 2));
        subscription.is_fully_used = Set(is_fully_used);
        subscription.insert(self.db).await.unwrap().id
    }

    pub async fn entry(&self, start_time: DateTime<Utc>) -> Uuid {
        TimelineEntryRepository::new(self.db.clone())
            .create(NewTimelineEntry {
                teacher_id: self.teacher_id,
                lesson_id: self.lesson_id,
                start_time,
                end_time: start_time + Duration::minutes(30),
                slots: 2,
            })
            .await
            .unwrap()
            .id
    }

    pub async fn class(
        &self,
        customer_id: Uuid,
        subscription_id: Option<Uuid>,
        timeline_id: Option<Uuid>,
    ) -> Uuid {
        let mut class = class_model::ActiveModel::new();
        class.customer_id = Set(customer_id);
        class.lesson_id = Set(self.lesson_id);
        class.subscription_id = Set(subscription_id);
        class.timeline_id = Set(timeline_id);
        class.insert(self.db).await.unwrap().id
    }
}

pub async fn insert_user(db: &DatabaseConnection, username: &str) -> user_model::Model {
    let mut user = user_model::ActiveModel::new();
    user.username = Set(username.to_string());
    user.email = Set(format!("{}@example.com", username));
    user.first_name = Set(username.to_string());
    user.last_name = Set(String::new());
    user.insert(db).await.unwrap()
}
