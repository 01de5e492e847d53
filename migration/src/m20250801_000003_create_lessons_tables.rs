use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // レッスン種別のレジストリ（app_label + model で一意）
        manager
            .create_table(
                Table::create()
                    .table(LessonTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LessonTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LessonTypes::AppLabel)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LessonTypes::Model).string_len(100).not_null())
                    .index(
                        Index::create()
                            .name("uq_lesson_types_app_label_model")
                            .col(LessonTypes::AppLabel)
                            .col(LessonTypes::Model)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lessons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lessons::LessonTypeId).integer().not_null())
                    .col(ColumnDef::new(Lessons::HostId).uuid())
                    .col(ColumnDef::new(Lessons::Name).string_len(140).not_null())
                    .col(
                        ColumnDef::new(Lessons::DurationMinutes)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Lessons::Slots)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Lessons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_lesson_type_id")
                            .from(Lessons::Table, Lessons::LessonTypeId)
                            .to(LessonTypes::Table, LessonTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_host_id")
                            .from(Lessons::Table, Lessons::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Lessons::Table)
                    .name("idx_lessons_lesson_type_id")
                    .col(Lessons::LessonTypeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LessonTypes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LessonTypes {
    Table,
    Id,
    AppLabel,
    Model,
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    LessonTypeId,
    HostId,
    Name,
    DurationMinutes,
    Slots,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
