//! Complaints module: listing, workflow transitions, stats

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
