//! # SUVIDHA Admin Service
//!
//! Administrative backend for a kiosk-based citizen-services platform.
//!
//! ## Architecture
//!
//! - **analytics**: Pure aggregation and reporting core (day buckets,
//!   dimension groupings, overview reductions, reconciliation)
//! - **application**: Cross-cutting application glue (audit trail)
//! - **infrastructure**: External concerns (database, crypto)
//! - **interfaces**: REST API with Swagger documentation

pub mod analytics;
pub mod application;
pub mod config;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
