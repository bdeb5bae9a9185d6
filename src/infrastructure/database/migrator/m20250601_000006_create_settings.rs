//! Create settings table (single-row organisation settings)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settings::OrgName).string())
                    .col(ColumnDef::new(Settings::SupportEmail).string())
                    .col(ColumnDef::new(Settings::PaymentMode).string())
                    .col(
                        ColumnDef::new(Settings::TxnFee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Settings::GatewayKeyId).string())
                    .col(ColumnDef::new(Settings::EnabledMethods).json().not_null())
                    .col(
                        ColumnDef::new(Settings::MaintenanceMode)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Settings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Settings::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Settings {
    Table,
    Id,
    OrgName,
    SupportEmail,
    PaymentMode,
    TxnFee,
    GatewayKeyId,
    EnabledMethods,
    MaintenanceMode,
    CreatedAt,
    UpdatedAt,
}
