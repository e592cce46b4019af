//! Stock error types.

use thiserror::Error;

/// Errors that can occur while validating stock operations.
#[derive(Debug, Error)]
pub enum StockError {
    /// Absolute quantities (adjustments, initial stock) cannot be negative.
    #[error("Quantity must be a non-negative number, got {0}")]
    InvalidQuantity(i32),

    /// Transfer quantities must be strictly positive.
    #[error("Transfer quantity must be positive, got {0}")]
    InvalidTransferQuantity(i32),

    /// A transfer between a store and itself moves nothing.
    #[error("Source and target stores must be different")]
    SameStoreTransfer,

    /// Store labels cannot be blank.
    #[error("Store id must not be empty")]
    EmptyStoreId,

    /// Minimum threshold above maximum threshold classifies nothing.
    #[error("Minimum threshold {min} cannot exceed maximum threshold {max}")]
    InvalidThresholds {
        /// The minimum threshold supplied.
        min: i32,
        /// The maximum threshold supplied.
        max: i32,
    },
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) | Self::InvalidTransferQuantity(_) => "INVALID_QUANTITY",
            Self::SameStoreTransfer => "INVALID_TRANSFER",
            Self::EmptyStoreId => "INVALID_STORE_ID",
            Self::InvalidThresholds { .. } => "INVALID_THRESHOLDS",
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
        assert_eq!(StockError::InvalidQuantity(-1).error_code(), "INVALID_QUANTITY");
        assert_eq!(
            StockError::InvalidTransferQuantity(0).error_code(),
            "INVALID_QUANTITY"
        );
        assert_eq!(StockError::SameStoreTransfer.error_code(), "INVALID_TRANSFER");
        assert_eq!(
            StockError::InvalidThresholds { min: 5, max: 1 }.error_code(),
            "INVALID_THRESHOLDS"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StockError::InvalidQuantity(-7).to_string(),
            "Quantity must be a non-negative number, got -7"
        );
        assert_eq!(
            StockError::InvalidThresholds { min: 10, max: 2 }.to_string(),
            "Minimum threshold 10 cannot exceed maximum threshold 2"
        );
    }
}
