//! Kiosks module: fleet CRUD, remote actions, per-kiosk stats

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
