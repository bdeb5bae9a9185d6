//! Application services

pub mod audit;

pub use audit::record_audit;
