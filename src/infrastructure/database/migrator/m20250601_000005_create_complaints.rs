//! Create complaints table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Complaints::ComplaintId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Complaints::DeptName).string())
                    .col(ColumnDef::new(Complaints::Category).string())
                    .col(ColumnDef::new(Complaints::Account).string())
                    .col(ColumnDef::new(Complaints::Priority).string())
                    .col(
                        ColumnDef::new(Complaints::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Complaints::AssignedTo).string())
                    .col(ColumnDef::new(Complaints::Resolution).string())
                    .col(ColumnDef::new(Complaints::History).json())
                    .col(ColumnDef::new(Complaints::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Complaints::EscalatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaints::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_status")
                    .table(Complaints::Table)
                    .col(Complaints::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Complaints {
    Table,
    Id,
    ComplaintId,
    DeptName,
    Category,
    Account,
    Priority,
    Status,
    AssignedTo,
    Resolution,
    History,
    ResolvedAt,
    EscalatedAt,
    CreatedAt,
    UpdatedAt,
}
