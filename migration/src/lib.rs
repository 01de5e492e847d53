// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// ユーザー・顧客
mod m20250801_000001_create_users_table;
mod m20250801_000002_create_customers_table;

// レッスン定義
mod m20250801_000003_create_lessons_tables;

// タイムライン・購入・クラス
mod m20250801_000004_create_timeline_entries_table;
mod m20250801_000005_create_subscriptions_table;
mod m20250801_000006_create_classes_table;

// 通知ジョブ用インデックス
mod m20250801_000007_add_notification_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250801_000001_create_users_table::Migration),
            // 2. usersテーブルに依存するテーブル
            Box::new(m20250801_000002_create_customers_table::Migration),
            Box::new(m20250801_000003_create_lessons_tables::Migration),
            Box::new(m20250801_000004_create_timeline_entries_table::Migration),
            // 3. customersテーブルに依存するテーブル
            Box::new(m20250801_000005_create_subscriptions_table::Migration),
            Box::new(m20250801_000006_create_classes_table::Migration),
            // 4. 通知ジョブのクエリ用インデックス
            Box::new(m20250801_000007_add_notification_indexes::Migration),
        ]
    }
}
