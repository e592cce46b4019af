//! Movement error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating a movement.
#[derive(Debug, Error)]
pub enum MovementError {
    /// Movement type string is not one of the closed set.
    #[error("Invalid movement type '{0}'. Must be 'IN', 'OUT' or 'TRANSFER'")]
    InvalidType(String),

    /// Movement quantity must be positive.
    #[error("Movement quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    /// IN movements have no originating store.
    #[error("IN movements cannot carry a source store")]
    SourceNotAllowed,

    /// OUT movements have no receiving store.
    #[error("OUT movements cannot carry a target store")]
    TargetNotAllowed,

    /// TRANSFER movements need both ends.
    #[error("TRANSFER movements must carry both source and target stores")]
    TransferStoresRequired,

    /// A transfer between a store and itself moves nothing.
    #[error("Source and target stores must be different")]
    SameStoreTransfer,

    /// Unit price metadata cannot be negative.
    #[error("Unit price cannot be negative, got {0}")]
    NegativeUnitPrice(Decimal),
}

impl MovementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidType(_) => "INVALID_MOVEMENT_TYPE",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::SourceNotAllowed
            | Self::TargetNotAllowed
            | Self::TransferStoresRequired => "INVALID_MOVEMENT_SHAPE",
            Self::SameStoreTransfer => "INVALID_TRANSFER",
            Self::NegativeUnitPrice(_) => "INVALID_UNIT_PRICE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MovementError::InvalidType("X".into()).error_code(),
            "INVALID_MOVEMENT_TYPE"
        );
        assert_eq!(
            MovementError::InvalidQuantity(0).error_code(),
            "INVALID_QUANTITY"
        );
        assert_eq!(
            MovementError::SameStoreTransfer.error_code(),
            "INVALID_TRANSFER"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            MovementError::InvalidType("RESTOCK".into()).to_string(),
            "Invalid movement type 'RESTOCK'. Must be 'IN', 'OUT' or 'TRANSFER'"
        );
        assert_eq!(
            MovementError::InvalidQuantity(-3).to_string(),
            "Movement quantity must be positive, got -3"
        );
    }

    #[test]
    fn test_all_movement_errors_are_bad_request() {
        assert_eq!(MovementError::SourceNotAllowed.http_status_code(), 400);
        assert_eq!(MovementError::SameStoreTransfer.http_status_code(), 400);
    }
}
