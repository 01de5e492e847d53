use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 開始間近のタイムライン検索用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(TimelineEntries::Table)
                    .name("idx_timeline_entries_start_time")
                    .col(TimelineEntries::StartTime)
                    .to_owned(),
            )
            .await?;

        // カレンダー表示（講師 + 期間）用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(TimelineEntries::Table)
                    .name("idx_timeline_entries_teacher_start")
                    .col(TimelineEntries::TeacherId)
                    .col(TimelineEntries::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Classes::Table)
                    .name("idx_classes_timeline_id")
                    .col(Classes::TimelineId)
                    .to_owned(),
            )
            .await?;

        // 非アクティブ顧客の集計（customer, subscription）用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Classes::Table)
                    .name("idx_classes_customer_subscription")
                    .col(Classes::CustomerId)
                    .col(Classes::SubscriptionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(Classes::Table)
                    .name("idx_classes_customer_subscription")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .table(Classes::Table)
                    .name("idx_classes_timeline_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .table(TimelineEntries::Table)
                    .name("idx_timeline_entries_teacher_start")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .table(TimelineEntries::Table)
                    .name("idx_timeline_entries_start_time")
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum TimelineEntries {
    Table,
    StartTime,
    TeacherId,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    TimelineId,
    CustomerId,
    SubscriptionId,
}
