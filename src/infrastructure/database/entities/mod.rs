//! Database entities module

pub mod audit_log;
pub mod blacklist_entry;
pub mod complaint;
pub mod department;
pub mod kiosk;
pub mod settings;
pub mod transaction;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use blacklist_entry::Entity as BlacklistEntry;
pub use complaint::Entity as Complaint;
pub use department::Entity as Department;
pub use kiosk::Entity as Kiosk;
pub use settings::Entity as Settings;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;
