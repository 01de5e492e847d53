// tests/common/mock_store.rs
//! NotificationStore のインメモリ実装。
//! ClassRepository と同じ条件（開始時刻は両端含む / 最終受講は厳密に before より前）で絞り込む。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use timeline_backend::domain::notification::{
    Audience, ClassNotice, Contact, StartingClass, StartingSoonQuery, SubscriptionActivity,
};
use timeline_backend::error::{AppError, AppResult};
use timeline_backend::repository::notification_store::NotificationStore;
use uuid::Uuid;

#[derive(Clone)]
struct UserRow {
    name: String,
    email: String,
}

#[derive(Clone)]
struct CustomerRow {
    user_id: Uuid,
    timezone: Tz,
}

#[derive(Clone)]
struct EntryRow {
    teacher_id: Uuid,
    lesson_name: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(Clone)]
struct SubscriptionRow {
    customer_id: Uuid,
    is_fully_used: bool,
}

#[derive(Clone)]
struct ClassRow {
    id: Uuid,
    customer_id: Uuid,
    subscription_id: Option<Uuid>,
    timeline_id: Option<Uuid>,
    teacher_notified: bool,
    student_notified: bool,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRow>,
    customers: HashMap<Uuid, CustomerRow>,
    entries: HashMap<Uuid, EntryRow>,
    subscriptions: HashMap<Uuid, SubscriptionRow>,
    classes: Vec<ClassRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().users.insert(
            id,
            UserRow {
                name: name.to_string(),
                email: email.to_string(),
            },
        );
        id
    }

    /// 顧客プロファイル付きユーザー
    pub fn add_customer(&self, name: &str, email: &str, timezone: Tz) -> Uuid {
        let user_id = self.add_user(name, email);
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .unwrap()
            .customers
            .insert(id, CustomerRow { user_id, timezone });
        id
    }

    pub fn add_entry(
        &self,
        teacher_id: Uuid,
        lesson_name: &str,
        start_time: DateTime<Utc>,
        duration: chrono::Duration,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().entries.insert(
            id,
            EntryRow {
                teacher_id,
                lesson_name: lesson_name.to_string(),
                start_time,
                end_time: start_time + duration,
            },
        );
        id
    }

    pub fn add_subscription(&self, customer_id: Uuid, is_fully_used: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().subscriptions.insert(
            id,
            SubscriptionRow {
                customer_id,
                is_fully_used,
            },
        );
        id
    }

    pub fn add_class(
        &self,
        customer_id: Uuid,
        subscription_id: Option<Uuid>,
        timeline_id: Option<Uuid>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().classes.push(ClassRow {
            id,
            customer_id,
            subscription_id,
            timeline_id,
            teacher_notified: false,
            student_notified: false,
        });
        id
    }

    pub fn set_flag(&self, class_id: Uuid, audience: Audience, value: bool) {
        let mut tables = self.tables.lock().unwrap();
        let class = tables
            .classes
            .iter_mut()
            .find(|class| class.id == class_id)
            .unwrap();
        match audience {
            Audience::Teacher => class.teacher_notified = value,
            Audience::Student => class.student_notified = value,
        }
    }

    /// (teacher_notified, student_notified)
    pub fn flags(&self, class_id: Uuid) -> (bool, bool) {
        let tables = self.tables.lock().unwrap();
        let class = tables
            .classes
            .iter()
            .find(|class| class.id == class_id)
            .unwrap();
        (class.teacher_notified, class.student_notified)
    }

    fn contact(tables: &Tables, user_id: Uuid, timezone: Tz) -> AppResult<Contact> {
        let user = tables
            .users
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        Ok(Contact {
            name: user.name.clone(),
            email: user.email.clone(),
            timezone,
        })
    }

    fn customer_contact_in(tables: &Tables, customer_id: Uuid) -> AppResult<Contact> {
        let customer = tables
            .customers
            .get(&customer_id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", customer_id)))?;
        Self::contact(tables, customer.user_id, customer.timezone)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn starting_soon(&self, query: &StartingSoonQuery) -> AppResult<Vec<StartingClass>> {
        let tables = self.tables.lock().unwrap();
        let mut classes: Vec<StartingClass> = tables
            .classes
            .iter()
            .filter_map(|class| {
                let timeline_id = class.timeline_id?;
                let entry = tables.entries.get(&timeline_id)?;
                Some(StartingClass {
                    class_id: class.id,
                    timeline_id,
                    customer_id: class.customer_id,
                    start_time: entry.start_time,
                    teacher_notified: class.teacher_notified,
                    student_notified: class.student_notified,
                })
            })
            .filter(|class| query.matches(class))
            .collect();
        classes.sort_by_key(|class| class.class_id);
        Ok(classes)
    }

    async fn mark_notified(&self, class_id: Uuid, audience: Audience) -> AppResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let class = tables
            .classes
            .iter_mut()
            .find(|class| class.id == class_id)
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))?;

        let flag = match audience {
            Audience::Teacher => &mut class.teacher_notified,
            Audience::Student => &mut class.student_notified,
        };
        if *flag {
            return Ok(false);
        }
        *flag = true;
        Ok(true)
    }

    async fn class_notice(&self, class_id: Uuid) -> AppResult<ClassNotice> {
        let tables = self.tables.lock().unwrap();
        let class = tables
            .classes
            .iter()
            .find(|class| class.id == class_id)
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", class_id)))?;
        let timeline_id = class.timeline_id.ok_or_else(|| {
            AppError::InternalServerError(format!("Class {} is not scheduled", class_id))
        })?;
        let entry = tables.entries.get(&timeline_id).ok_or_else(|| {
            AppError::NotFound(format!("Timeline entry {} not found", timeline_id))
        })?;

        // 講師の顧客プロファイルがあればそのタイムゾーン
        let teacher_tz = tables
            .customers
            .values()
            .find(|customer| customer.user_id == entry.teacher_id)
            .map_or(Tz::UTC, |customer| customer.timezone);

        Ok(ClassNotice {
            class_id,
            timeline_id,
            lesson_name: entry.lesson_name.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            teacher: Self::contact(&tables, entry.teacher_id, teacher_tz)?,
            student: Self::customer_contact_in(&tables, class.customer_id)?,
        })
    }

    async fn inactive_subscriptions(
        &self,
        before: DateTime<Utc>,
    ) -> AppResult<Vec<SubscriptionActivity>> {
        let tables = self.tables.lock().unwrap();

        let mut latest: BTreeMap<(Uuid, Uuid), DateTime<Utc>> = BTreeMap::new();
        for class in &tables.classes {
            let (Some(subscription_id), Some(timeline_id)) =
                (class.subscription_id, class.timeline_id)
            else {
                continue;
            };
            let Some(subscription) = tables.subscriptions.get(&subscription_id) else {
                continue;
            };
            if subscription.is_fully_used {
                continue;
            }
            let Some(entry) = tables.entries.get(&timeline_id) else {
                continue;
            };

            let slot = latest
                .entry((class.customer_id, subscription_id))
                .or_insert(entry.start_time);
            if entry.start_time > *slot {
                *slot = entry.start_time;
            }
        }

        Ok(latest
            .into_iter()
            .filter(|(_, latest_start)| *latest_start < before)
            .map(|((customer_id, subscription_id), latest_start)| SubscriptionActivity {
                customer_id,
                subscription_id,
                latest_start,
            })
            .collect())
    }

    async fn customer_contact(&self, customer_id: Uuid) -> AppResult<Contact> {
        let tables = self.tables.lock().unwrap();
        Self::customer_contact_in(&tables, customer_id)
    }
}
