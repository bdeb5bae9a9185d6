pub mod analytics;
pub mod auth;
pub mod complaints;
pub mod departments;
pub mod health;
pub mod kiosks;
pub mod settings;
pub mod transactions;
