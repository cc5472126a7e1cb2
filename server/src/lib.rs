// sellerdesk-server/src/lib.rs

//! HTTP backend for the seller-admin dashboard.

pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
