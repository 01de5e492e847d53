// src/repository/class_repository.rs
use crate::domain::class_model::{self, Entity as ClassEntity};
use crate::domain::customer_model::{Entity as CustomerEntity, Model as CustomerModel};
use crate::domain::lesson_model::Entity as LessonEntity;
use crate::domain::notification::{
    Audience, ClassNotice, Contact, StartingClass, StartingSoonQuery, SubscriptionActivity,
};
use crate::domain::subscription_model;
use crate::domain::timeline_entry_model::{self, Entity as TimelineEntryEntity};
use crate::domain::user_model::{self, Entity as UserEntity};
use crate::error::{AppError, AppResult};
use crate::repository::notification_store::NotificationStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

#[derive(Debug, FromQueryResult)]
struct SubscriptionActivityRow {
    customer_id: Uuid,
    subscription_id: Uuid,
    latest_start: DateTime<Utc>,
}

pub struct ClassRepository {
    db: DbConn,
}

impl ClassRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<class_model::Model>, DbErr> {
        ClassEntity::find_by_id(id).one(&self.db).await
    }

    fn flag_column(audience: Audience) -> class_model::Column {
        match audience {
            Audience::Teacher => class_model::Column::PreStartNotificationsSentToTeacher,
            Audience::Student => class_model::Column::PreStartNotificationsSentToStudent,
        }
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<user_model::Model> {
        UserEntity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// 講師の連絡先。顧客プロファイルが無ければUTC
    async fn user_contact(&self, user_id: Uuid) -> AppResult<Contact> {
        let user = self.find_user(user_id).await?;
        let timezone = CustomerEntity::find()
            .filter(crate::domain::customer_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map_or(Tz::UTC, |customer| customer.tz());

        Ok(Contact {
            name: user.full_name(),
            email: user.email,
            timezone,
        })
    }

    async fn find_customer(&self, customer_id: Uuid) -> AppResult<CustomerModel> {
        CustomerEntity::find_by_id(customer_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", customer_id)))
    }
}

#[async_trait]
impl NotificationStore for ClassRepository {
    async fn starting_soon(&self, query: &StartingSoonQuery) -> AppResult<Vec<StartingClass>> {
        let mut select = ClassEntity::find()
            .find_also_related(TimelineEntryEntity)
            .filter(timeline_entry_model::Column::StartTime.between(query.from, query.until));

        if let Some(timeline_id) = query.timeline_id {
            select = select.filter(class_model::Column::TimelineId.eq(timeline_id));
        }

        if let Some(audience) = query.pending_for {
            select = select.filter(Self::flag_column(audience).eq(false));
        }

        let rows = select
            .order_by_asc(class_model::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(class, entry)| {
                entry.map(|entry| StartingClass {
                    class_id: class.id,
                    timeline_id: entry.id,
                    customer_id: class.customer_id,
                    start_time: entry.start_time,
                    teacher_notified: class.pre_start_notifications_sent_to_teacher,
                    student_notified: class.pre_start_notifications_sent_to_student,
                })
            })
            .collect())
    }

    async fn mark_notified(&self, class_id: Uuid, audience: Audience) -> AppResult<bool> {
        let flag = Self::flag_column(audience);

        // フラグが false の行だけを更新する
        let result = ClassEntity::update_many()
            .col_expr(flag, Expr::value(true))
            .col_expr(class_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(class_model::Column::Id.eq(class_id))
            .filter(flag.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn class_notice(&self, class_id: Uuid) -> AppResult<ClassNotice> {
        let class = self
            .find_by_id(class_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))?;

        let timeline_id = class.timeline_id.ok_or_else(|| {
            AppError::InternalServerError(format!("Class {} is not scheduled", class_id))
        })?;

        let entry = TimelineEntryEntity::find_by_id(timeline_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Timeline entry {} not found", timeline_id))
            })?;

        let lesson = LessonEntity::find_by_id(entry.lesson_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson {} not found", entry.lesson_id)))?;

        let teacher = self.user_contact(entry.teacher_id).await?;
        let student = self.customer_contact(class.customer_id).await?;

        Ok(ClassNotice {
            class_id: class.id,
            timeline_id: entry.id,
            lesson_name: lesson.name,
            start_time: entry.start_time,
            end_time: entry.end_time,
            teacher,
            student,
        })
    }

    async fn inactive_subscriptions(
        &self,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<SubscriptionActivity>> {
        let latest_start = Expr::col((
            TimelineEntryEntity,
            timeline_entry_model::Column::StartTime,
        ))
        .max();

        // (customer, subscription) ごとに最終レッスン開始時刻を集計
        let rows = ClassEntity::find()
            .select_only()
            .column(class_model::Column::CustomerId)
            .column(class_model::Column::SubscriptionId)
            .column_as(latest_start.clone(), "latest_start")
            .join(JoinType::InnerJoin, class_model::Relation::TimelineEntry.def())
            .join(JoinType::InnerJoin, class_model::Relation::Subscription.def())
            .filter(subscription_model::Column::IsFullyUsed.eq(false))
            .group_by(class_model::Column::CustomerId)
            .group_by(class_model::Column::SubscriptionId)
            .having(Expr::expr(latest_start).lt(before))
            .order_by_asc(class_model::Column::CustomerId)
            .order_by_asc(class_model::Column::SubscriptionId)
            .into_model::<SubscriptionActivityRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SubscriptionActivity {
                customer_id: row.customer_id,
                subscription_id: row.subscription_id,
                latest_start: row.latest_start,
            })
            .collect())
    }

    async fn customer_contact(&self, customer_id: Uuid) -> AppResult<Contact> {
        let customer = self.find_customer(customer_id).await?;
        let user = self.find_user(customer.user_id).await?;

        Ok(Contact {
            name: user.full_name(),
            email: user.email,
            timezone: customer.tz(),
        })
    }
}
