// tests/repository_tests.rs
//! ClassRepository / TimelineEntryRepository の SQL を実 PostgreSQL で検証する。
//! Docker が必要なので `cargo test -- --ignored` で実行する。

mod common;

use chrono::{DateTime, Duration, Utc};
use common::db::TestDatabase;
use common::seed::Seed;
use common::test_data::lesson_start;
use timeline_backend::domain::notification::{Audience, StartingSoonQuery};
use timeline_backend::domain::timeline_entry_model;
use timeline_backend::repository::class_repository::ClassRepository;
use timeline_backend::repository::notification_store::NotificationStore;
use timeline_backend::repository::timeline_entry_repository::TimelineEntryRepository;

fn now() -> DateTime<Utc> {
    lesson_start() - Duration::minutes(14)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_starting_soon_filters_by_window_and_flag() {
    let test_db = TestDatabase::new().await;
    let seed = Seed::new(&test_db.connection).await;
    let repo = ClassRepository::new(test_db.connection.clone());

    let customer = seed.customer("alice", "Europe/Moscow").await;
    let soon = seed.entry(lesson_start()).await;
    let later = seed.entry(lesson_start() + Duration::hours(2)).await;
    let soon_class = seed.class(customer, None, Some(soon)).await;
    seed.class(customer, None, Some(later)).await;
    seed.class(customer, None, None).await;

    let query = StartingSoonQuery::new(now(), Duration::minutes(30));
    let found = repo
        .starting_soon(&query.clone().pending_for(Audience::Teacher))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].class_id, soon_class);
    assert_eq!(found[0].timeline_id, soon);

    assert!(repo.mark_notified(soon_class, Audience::Teacher).await.unwrap());
    let found = repo
        .starting_soon(&query.clone().pending_for(Audience::Teacher))
        .await
        .unwrap();
    assert!(found.is_empty());

    // 講師向けフラグだけ立っているので受講者向けには残る
    let found = repo
        .starting_soon(&query.pending_for(Audience::Student))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_mark_notified_is_conditional() {
    let test_db = TestDatabase::new().await;
    let seed = Seed::new(&test_db.connection).await;
    let repo = ClassRepository::new(test_db.connection.clone());

    let customer = seed.customer("alice", "UTC").await;
    let class = seed.class(customer, None, Some(seed.entry(lesson_start()).await)).await;

    assert!(repo.mark_notified(class, Audience::Student).await.unwrap());
    assert!(!repo.mark_notified(class, Audience::Student).await.unwrap());

    let stored = repo.find_by_id(class).await.unwrap().unwrap();
    assert!(stored.pre_start_notifications_sent_to_student);
    assert!(!stored.pre_start_notifications_sent_to_teacher);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_class_notice_resolves_contacts() {
    let test_db = TestDatabase::new().await;
    let seed = Seed::new(&test_db.connection).await;
    let repo = ClassRepository::new(test_db.connection.clone());

    let customer = seed.customer("ivan", "Europe/Moscow").await;
    let entry = seed.entry(lesson_start()).await;
    let class = seed.class(customer, None, Some(entry)).await;

    let notice = repo.class_notice(class).await.unwrap();

    assert_eq!(notice.timeline_id, entry);
    assert_eq!(notice.lesson_name, "Ordinary lesson");
    assert_eq!(notice.start_time, lesson_start());
    assert_eq!(notice.student.email, "ivan@example.com");
    assert_eq!(notice.student.timezone, chrono_tz::Europe::Moscow);
    assert_eq!(notice.teacher.email, "teacher@example.com");
    assert_eq!(notice.teacher.timezone, chrono_tz::Tz::UTC);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_inactive_subscriptions_groups_by_subscription() {
    let test_db = TestDatabase::new().await;
    let seed = Seed::new(&test_db.connection).await;
    let repo = ClassRepository::new(test_db.connection.clone());

    let alice = seed.customer("alice", "UTC").await;
    let bob = seed.customer("bob", "UTC").await;

    let old = seed.entry(lesson_start()).await;
    let older = seed.entry(lesson_start() - Duration::days(3)).await;
    let recent = seed.entry(lesson_start() + Duration::days(7)).await;

    // alice: 古いクラスだけの未消化サブスクリプション
    let alice_sub = seed.subscription(alice, false).await;
    seed.class(alice, Some(alice_sub), Some(older)).await;
    seed.class(alice, Some(alice_sub), Some(old)).await;

    // bob: 最近のクラスがあるので対象外、消化済みも対象外
    let bob_sub = seed.subscription(bob, false).await;
    seed.class(bob, Some(bob_sub), Some(old)).await;
    seed.class(bob, Some(bob_sub), Some(recent)).await;
    let bob_used = seed.subscription(bob, true).await;
    seed.class(bob, Some(bob_used), Some(old)).await;

    let before = lesson_start() + Duration::days(1);
    let inactive = repo.inactive_subscriptions(before).await.unwrap();

    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].customer_id, alice);
    assert_eq!(inactive[0].subscription_id, alice_sub);
    assert_eq!(inactive[0].latest_start, lesson_start());

    // 境界は含まない
    let inactive = repo.inactive_subscriptions(lesson_start()).await.unwrap();
    assert!(inactive.is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_find_for_teacher_between_is_ordered() {
    let test_db = TestDatabase::new().await;
    let seed = Seed::new(&test_db.connection).await;
    let repo = TimelineEntryRepository::new(test_db.connection.clone());

    let second = seed.entry(lesson_start() + Duration::hours(1)).await;
    let first = seed.entry(lesson_start()).await;
    seed.entry(lesson_start() + Duration::days(30)).await;

    let entries = repo
        .find_for_teacher_between(
            seed.teacher_id,
            lesson_start(),
            lesson_start() + Duration::days(1),
        )
        .await
        .unwrap();

    let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(entries.iter().all(|e: &timeline_entry_model::Model| e.slots == 2));
}
