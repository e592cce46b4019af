//! Stock quantity domain logic.
//!
//! This module implements the rules that keep per-store quantities
//! meaningful:
//! - Non-negativity of quantities and thresholds
//! - Transfer request validation
//! - Level classification against configured thresholds
//! - Low-stock detection and deficits

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::StockError;
pub use service::StockService;
pub use types::{Adjustment, StockLevel, StockLevelReport, TransferRequest};
