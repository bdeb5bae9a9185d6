//! Dashboard analytics module: overview, charts, rankings

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
