//! Shared configuration and boundary error types for Stockroom.
//!
//! This crate provides the pieces every other crate needs:
//! - Application configuration (server, database, inventory behavior)
//! - Boundary error types for request-shape failures

pub mod config;
pub mod error;

pub use config::{AppConfig, InventorySettings};
pub use error::{AppError, AppResult};
