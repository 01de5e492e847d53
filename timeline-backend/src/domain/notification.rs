// src/domain/notification.rs

//! 通知ジョブが扱う読み取り専用のビュー型。
//!
//! 永続化層（sea-orm / テスト用インメモリ）の違いを吸収するため、
//! ジョブはエンティティではなくこれらの型だけを受け取る。

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

/// 開始前通知の宛先区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Teacher,
    Student,
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::Teacher => write!(f, "teacher"),
            Audience::Student => write!(f, "student"),
        }
    }
}

/// 「まもなく開始」クラスの検索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingSoonQuery {
    /// タイムラインの開始時刻がこの範囲（両端含む）に入るクラス
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    /// 指定した宛先の通知フラグが false のものに限定
    pub pending_for: Option<Audience>,
    /// 指定したタイムラインのクラスに限定
    pub timeline_id: Option<Uuid>,
}

impl StartingSoonQuery {
    pub fn new(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            from: now,
            until: now + window,
            pending_for: None,
            timeline_id: None,
        }
    }

    pub fn pending_for(mut self, audience: Audience) -> Self {
        self.pending_for = Some(audience);
        self
    }

    pub fn in_timeline(mut self, timeline_id: Uuid) -> Self {
        self.timeline_id = Some(timeline_id);
        self
    }

    /// 条件に合致するか（インメモリ実装・検証用）
    pub fn matches(&self, class: &StartingClass) -> bool {
        if class.start_time < self.from || class.start_time > self.until {
            return false;
        }
        if let Some(timeline_id) = self.timeline_id {
            if class.timeline_id != timeline_id {
                return false;
            }
        }
        match self.pending_for {
            Some(Audience::Teacher) => !class.teacher_notified,
            Some(Audience::Student) => !class.student_notified,
            None => true,
        }
    }
}

/// スケジュール済みクラスとそのタイムライン開始時刻
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingClass {
    pub class_id: Uuid,
    pub timeline_id: Uuid,
    pub customer_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub teacher_notified: bool,
    pub student_notified: bool,
}

/// メール送信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub timezone: Tz,
}

/// 開始前通知シグナルのペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNotice {
    pub class_id: Uuid,
    pub timeline_id: Uuid,
    pub lesson_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub teacher: Contact,
    pub student: Contact,
}

/// (customer, subscription) ごとの最終レッスン開始時刻
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionActivity {
    pub customer_id: Uuid,
    pub subscription_id: Uuid,
    pub latest_start: DateTime<Utc>,
}
