//! Create kiosks table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kiosks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Kiosks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Kiosks::KioskId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Kiosks::Location).string())
                    .col(ColumnDef::new(Kiosks::City).string())
                    .col(
                        ColumnDef::new(Kiosks::Status)
                            .string()
                            .not_null()
                            .default("offline"),
                    )
                    .col(ColumnDef::new(Kiosks::CurrentSession).string())
                    .col(ColumnDef::new(Kiosks::LastOnline).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Kiosks::TotalSessions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Kiosks::TodaySessions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Kiosks::Uptime).double())
                    .col(
                        ColumnDef::new(Kiosks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Kiosks::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index for the fleet status breakdown
        manager
            .create_index(
                Index::create()
                    .name("idx_kiosks_status")
                    .table(Kiosks::Table)
                    .col(Kiosks::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Kiosks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Kiosks {
    Table,
    Id,
    KioskId,
    Location,
    City,
    Status,
    CurrentSession,
    LastOnline,
    TotalSessions,
    TodaySessions,
    Uptime,
    CreatedAt,
    UpdatedAt,
}
