// src/tasks/pre_start.rs
use crate::domain::notification::{Audience, StartingClass, StartingSoonQuery};
use crate::error::AppResult;
use crate::log_with_context;
use crate::repository::notification_store::NotificationStore;
use crate::signals::{ClassSignal, SignalBus};
use crate::tasks::{PeriodicJob, NOTIFY_15MIN_TO_CLASS};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 1回の実行で送ったシグナル数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreStartReport {
    pub teacher_signals: usize,
    pub student_signals: usize,
}

/// 開始間近のクラスを検出し、講師・受講者向けの開始シグナルを送る
pub struct PreStartNotifier {
    store: Arc<dyn NotificationStore>,
    signals: Arc<SignalBus>,
    window: Duration,
}

impl PreStartNotifier {
    pub fn new(store: Arc<dyn NotificationStore>, signals: Arc<SignalBus>, window: Duration) -> Self {
        Self {
            store,
            signals,
            window,
        }
    }

    pub async fn notify_15min_to_class(&self, now: DateTime<Utc>) -> AppResult<PreStartReport> {
        let starting_soon = StartingSoonQuery::new(now, self.window);
        let mut report = PreStartReport::default();

        // 講師向け: 同じタイムラインのクラスはまとめて1通
        let pending_for_teacher = self
            .store
            .starting_soon(&starting_soon.clone().pending_for(Audience::Teacher))
            .await?;

        for representative in one_per_timeline(pending_for_teacher) {
            let siblings = self
                .store
                .starting_soon(&starting_soon.clone().in_timeline(representative.timeline_id))
                .await?;

            // シグナル送信前に同じタイムラインの全クラスへフラグを立てる
            let mut flipped = 0;
            for sibling in &siblings {
                if self
                    .store
                    .mark_notified(sibling.class_id, Audience::Teacher)
                    .await?
                {
                    flipped += 1;
                }
            }

            if flipped == 0 {
                debug!(
                    timeline_id = %representative.timeline_id,
                    "Teacher already notified for timeline, skipping"
                );
                continue;
            }

            let notice = self.store.class_notice(representative.class_id).await?;
            self.signals.send(ClassSignal::StartingTeacher(notice)).await?;
            report.teacher_signals += 1;

            info!(
                class_id = %representative.class_id,
                timeline_id = %representative.timeline_id,
                siblings = siblings.len(),
                "Class starting soon, teacher notified"
            );
        }

        // 受講者向け: クラスごとに1通
        let pending_for_student = self
            .store
            .starting_soon(&starting_soon.pending_for(Audience::Student))
            .await?;

        for class in pending_for_student {
            if !self
                .store
                .mark_notified(class.class_id, Audience::Student)
                .await?
            {
                continue;
            }

            let notice = self.store.class_notice(class.class_id).await?;
            self.signals.send(ClassSignal::StartingStudent(notice)).await?;
            report.student_signals += 1;

            info!(
                class_id = %class.class_id,
                customer_id = %class.customer_id,
                "Class starting soon, student notified"
            );
        }

        Ok(report)
    }
}

#[async_trait]
impl PeriodicJob for PreStartNotifier {
    fn name(&self) -> &'static str {
        NOTIFY_15MIN_TO_CLASS
    }

    async fn run(&self, now: DateTime<Utc>) -> AppResult<()> {
        let report = self.notify_15min_to_class(now).await?;
        log_with_context!(
            tracing::Level::INFO,
            "Pre-start notifications processed",
            "job" => NOTIFY_15MIN_TO_CLASS,
            "teacher_signals" => report.teacher_signals,
            "student_signals" => report.student_signals,
        );
        Ok(())
    }
}

/// タイムラインごとに最初に現れたクラスを代表として残す
fn one_per_timeline(classes: Vec<StartingClass>) -> Vec<StartingClass> {
    let mut seen = HashSet::new();
    classes
        .into_iter()
        .filter(|class| seen.insert(class.timeline_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn class(timeline_id: Uuid) -> StartingClass {
        StartingClass {
            class_id: Uuid::new_v4(),
            timeline_id,
            customer_id: Uuid::new_v4(),
            start_time: Utc::now(),
            teacher_notified: false,
            student_notified: false,
        }
    }

    #[test]
    fn test_one_per_timeline_keeps_first() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let classes = vec![class(a), class(b), class(a), class(a)];
        let first_a = classes[0].class_id;

        let representatives = one_per_timeline(classes);

        assert_eq!(representatives.len(), 2);
        assert_eq!(representatives[0].class_id, first_a);
        assert_eq!(representatives[1].timeline_id, b);
    }
}
