//! Departments module: CRUD plus the embedded service catalogue

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
