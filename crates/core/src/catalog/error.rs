//! Catalog error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating product fields.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required text field is blank or whitespace-only.
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Prices cannot be negative.
    #[error("Price cannot be negative, got {0}")]
    NegativePrice(Decimal),
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyField(_) => "EMPTY_FIELD",
            Self::NegativePrice(_) => "INVALID_PRICE",
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(CatalogError::EmptyField("sku").error_code(), "EMPTY_FIELD");
        assert_eq!(
            CatalogError::NegativePrice(dec!(-1)).error_code(),
            "INVALID_PRICE"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CatalogError::EmptyField("name").to_string(),
            "Field 'name' must not be empty"
        );
        assert_eq!(
            CatalogError::NegativePrice(dec!(-2.50)).to_string(),
            "Price cannot be negative, got -2.50"
        );
    }
}
