//! Transactions module: listing, revenue, reconciliation, export

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
