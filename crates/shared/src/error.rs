//! Boundary error types.
//!
//! These cover request-shape failures the domain logic never sees:
//! malformed identifiers, missing required fields, and opaque internal
//! failures. Domain rule violations carry their own error enums in the
//! core and db crates.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Boundary error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// A reference that is not a well-formed identifier.
    #[error("Invalid {0} format")]
    InvalidIdentifier(String),

    /// One or more required fields are absent from the request.
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a `MissingFields` error from the absent field names.
    #[must_use]
    pub fn missing(fields: &[&str]) -> Self {
        Self::MissingFields(fields.join(", "))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier(_) | Self::MissingFields(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::MissingFields(_) => "MISSING_FIELD",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidIdentifier("product id".into()).status_code(),
            400
        );
        assert_eq!(AppError::missing(&["sku"]).status_code(), 400);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::InvalidIdentifier(String::new()).error_code(),
            "INVALID_IDENTIFIER"
        );
        assert_eq!(AppError::missing(&[]).error_code(), "MISSING_FIELD");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::InvalidIdentifier("product id".into()).to_string(),
            "Invalid product id format"
        );
        assert_eq!(
            AppError::missing(&["name", "price"]).to_string(),
            "Missing required fields: name, price"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }
}
