//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_kiosks;
mod m20250601_000003_create_departments;
mod m20250601_000004_create_transactions;
mod m20250601_000005_create_complaints;
mod m20250601_000006_create_settings;
mod m20250601_000007_create_audit_logs;
mod m20250601_000008_create_blacklist;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_kiosks::Migration),
            Box::new(m20250601_000003_create_departments::Migration),
            Box::new(m20250601_000004_create_transactions::Migration),
            Box::new(m20250601_000005_create_complaints::Migration),
            Box::new(m20250601_000006_create_settings::Migration),
            Box::new(m20250601_000007_create_audit_logs::Migration),
            Box::new(m20250601_000008_create_blacklist::Migration),
        ]
    }
}
