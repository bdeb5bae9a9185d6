//! Settings module: organisation settings, payment config, audit
//! trail and the phone blacklist

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
