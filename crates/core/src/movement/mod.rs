//! Stock movement domain logic.
//!
//! This module implements the movement side of the inventory ledger:
//! - The closed set of movement types (IN, OUT, TRANSFER)
//! - Movement drafts and their shape validation
//! - Signed quantity deltas for applying movements to stock
//! - Error types for movement validation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::MovementError;
pub use service::MovementService;
pub use types::{MovementDraft, MovementMetadata, MovementType};
