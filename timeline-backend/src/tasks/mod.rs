// src/tasks/mod.rs

pub mod inactive_reminder;
pub mod pre_start;
pub mod scheduler;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::repository::notification_store::NotificationStore;
use crate::signals::SignalBus;
use crate::utils::email::Mailer;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub use inactive_reminder::{InactiveStudentReminder, ReminderReport};
pub use pre_start::{PreStartNotifier, PreStartReport};
pub use scheduler::JobScheduler;

pub const NOTIFY_15MIN_TO_CLASS: &str = "timeline.notify_15min_to_class";
pub const NOTIFY_STUDY_SOMETIMES: &str = "timeline.notify_study_sometimes";

/// 引数なしで定期実行されるジョブ
#[async_trait]
pub trait PeriodicJob: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, now: DateTime<Utc>) -> AppResult<()>;
}

/// 2つの通知ジョブを設定どおりの間隔で登録したスケジューラ
pub fn build_scheduler(
    config: &AppConfig,
    store: Arc<dyn NotificationStore>,
    signals: Arc<SignalBus>,
    mailer: Arc<dyn Mailer>,
) -> JobScheduler {
    let mut scheduler = JobScheduler::new();

    scheduler.register(
        Arc::new(PreStartNotifier::new(
            store.clone(),
            signals,
            chrono::Duration::minutes(config.notification.starting_soon_window_minutes),
        )),
        Duration::from_secs(config.scheduler.pre_start_interval_secs),
    );

    scheduler.register(
        Arc::new(InactiveStudentReminder::new(
            store,
            mailer,
            chrono::Duration::days(config.notification.inactive_after_days),
        )),
        Duration::from_secs(config.scheduler.inactive_reminder_interval_secs),
    );

    scheduler
}
