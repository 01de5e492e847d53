// src/tasks/inactive_reminder.rs
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::notification_store::NotificationStore;
use crate::tasks::{PeriodicJob, NOTIFY_STUDY_SOMETIMES};
use crate::utils::email::{MailTemplate, Mailer, OutgoingMail};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReminderReport {
    /// 条件に合った (customer, subscription) の数
    pub inactive_subscriptions: usize,
    /// 実際に送ったリマインド数（顧客単位）
    pub reminded: usize,
}

/// 未消化のサブスクリプションがあるのにしばらく受講していない顧客へのリマインド
///
/// 送信済みの記録は持たないので、実行間隔（1日1回）がそのまま送信頻度になる。
pub struct InactiveStudentReminder {
    store: Arc<dyn NotificationStore>,
    mailer: Arc<dyn Mailer>,
    inactive_after: Duration,
}

impl InactiveStudentReminder {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        inactive_after: Duration,
    ) -> Self {
        Self {
            store,
            mailer,
            inactive_after,
        }
    }

    pub async fn notify_study_sometimes(&self, now: DateTime<Utc>) -> AppResult<ReminderReport> {
        let last_week = now - self.inactive_after;
        let inactive = self.store.inactive_subscriptions(last_week).await?;

        let mut report = ReminderReport {
            inactive_subscriptions: inactive.len(),
            reminded: 0,
        };

        // 複数のサブスクリプションが該当しても顧客ごとに1通
        let mut reminded = HashSet::new();
        for activity in &inactive {
            if !reminded.insert(activity.customer_id) {
                continue;
            }

            let customer = self.store.customer_contact(activity.customer_id).await?;
            let to = vec![customer.email.clone()];
            let timezone = customer.timezone;

            self.mailer
                .send(OutgoingMail::new(
                    MailTemplate::ReminderForInactiveStudents { customer },
                    to,
                    timezone,
                ))
                .await?;
            report.reminded += 1;

            info!(
                customer_id = %activity.customer_id,
                latest_start = %activity.latest_start,
                "Inactive student reminded"
            );
        }

        Ok(report)
    }
}

#[async_trait]
impl PeriodicJob for InactiveStudentReminder {
    fn name(&self) -> &'static str {
        NOTIFY_STUDY_SOMETIMES
    }

    async fn run(&self, now: DateTime<Utc>) -> AppResult<()> {
        let report = self.notify_study_sometimes(now).await?;
        log_with_context!(
            tracing::Level::INFO,
            "Inactive student reminders processed",
            "job" => NOTIFY_STUDY_SOMETIMES,
            "inactive_subscriptions" => report.inactive_subscriptions,
            "reminded" => report.reminded,
        );
        Ok(())
    }
}
