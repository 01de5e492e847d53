// src/repository/notification_store.rs

use crate::domain::notification::{
    Audience, ClassNotice, Contact, StartingClass, StartingSoonQuery, SubscriptionActivity,
};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 通知ジョブが必要とする永続化操作
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// 条件に合う「まもなく開始」クラス（クラスID昇順）
    async fn starting_soon(&self, query: &StartingSoonQuery) -> AppResult<Vec<StartingClass>>;

    /// 通知済みフラグを立てる。このフラグをこの呼び出しで false → true にした場合のみ true
    async fn mark_notified(&self, class_id: Uuid, audience: Audience) -> AppResult<bool>;

    /// シグナルのペイロードを組み立てる
    async fn class_notice(&self, class_id: Uuid) -> AppResult<ClassNotice>;

    /// 未消化サブスクリプションのうち、最後のレッスン開始が `before` より前のもの
    async fn inactive_subscriptions(
        &self,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<SubscriptionActivity>>;

    /// 顧客の連絡先（アカウントのメールと登録タイムゾーン）
    async fn customer_contact(&self, customer_id: Uuid) -> AppResult<Contact>;
}
