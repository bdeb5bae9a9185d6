//! Authentication module: login, registration, profile, password change
//! and admin-only user management

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
