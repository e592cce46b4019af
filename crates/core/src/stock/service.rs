//! Stock validation and classification service.
//!
//! Pure rules over quantities and thresholds. The storage layer owns
//! the atomic mutation primitives; everything here is side-effect free
//! and usable both before a mutation and in read-only reporting.

use super::error::StockError;
use super::types::{Adjustment, StockLevel, StockLevelReport, TransferRequest};

/// Stock validation and classification service.
pub struct StockService;

impl StockService {
    /// Validates a transfer request: distinct non-empty stores and a
    /// positive quantity.
    ///
    /// Sufficiency of the source stock is not checked here; it is
    /// re-validated at mutation time by the conditional update, which
    /// closes the read-then-write race.
    ///
    /// # Errors
    ///
    /// Returns `StockError` describing the first violated rule.
    pub fn validate_transfer(request: &TransferRequest) -> Result<(), StockError> {
        if request.source_store_id.trim().is_empty() || request.target_store_id.trim().is_empty() {
            return Err(StockError::EmptyStoreId);
        }
        if request.source_store_id == request.target_store_id {
            return Err(StockError::SameStoreTransfer);
        }
        if request.quantity <= 0 {
            return Err(StockError::InvalidTransferQuantity(request.quantity));
        }
        Ok(())
    }

    /// Validates an absolute quantity (manual adjustment, initial stock).
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidQuantity` when negative.
    pub fn validate_quantity(quantity: i32) -> Result<(), StockError> {
        if quantity < 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        Ok(())
    }

    /// Validates every entry of a bulk adjustment. No entry may carry a
    /// negative quantity; the first offender fails the whole batch.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidQuantity` for the first negative entry.
    pub fn validate_bulk(adjustments: &[Adjustment]) -> Result<(), StockError> {
        for adjustment in adjustments {
            Self::validate_quantity(adjustment.quantity)?;
        }
        Ok(())
    }

    /// Classifies a quantity against a minimum and maximum threshold.
    ///
    /// `low` when strictly below the minimum, `excess` when strictly
    /// above the maximum, `normal` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StockError::InvalidThresholds` when `min > max`.
    pub fn classify(
        quantity: i32,
        min_threshold: i32,
        max_threshold: i32,
    ) -> Result<StockLevelReport, StockError> {
        if min_threshold > max_threshold {
            return Err(StockError::InvalidThresholds {
                min: min_threshold,
                max: max_threshold,
            });
        }

        let level = if quantity < min_threshold {
            StockLevel::Low
        } else if quantity > max_threshold {
            StockLevel::Excess
        } else {
            StockLevel::Normal
        };

        Ok(StockLevelReport {
            quantity,
            min_threshold,
            max_threshold,
            level,
        })
    }

    /// Returns true when a record counts as low stock: at or below its
    /// configured threshold.
    #[must_use]
    pub const fn is_low(quantity: i32, min_stock: i32) -> bool {
        quantity <= min_stock
    }

    /// Units missing to reach the configured threshold. Zero when the
    /// quantity already meets it.
    #[must_use]
    pub const fn deficit(quantity: i32, min_stock: i32) -> i32 {
        let gap = min_stock - quantity;
        if gap > 0 { gap } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn transfer(source: &str, target: &str, quantity: i32) -> TransferRequest {
        TransferRequest {
            product_id: Uuid::new_v4(),
            source_store_id: source.to_string(),
            target_store_id: target.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_valid_transfer() {
        assert!(StockService::validate_transfer(&transfer("store001", "store002", 30)).is_ok());
    }

    #[test]
    fn test_same_store_transfer_rejected() {
        assert!(matches!(
            StockService::validate_transfer(&transfer("store001", "store001", 30)),
            Err(StockError::SameStoreTransfer)
        ));
    }

    #[test]
    fn test_empty_store_rejected() {
        assert!(matches!(
            StockService::validate_transfer(&transfer("", "store002", 30)),
            Err(StockError::EmptyStoreId)
        ));
        assert!(matches!(
            StockService::validate_transfer(&transfer("store001", "   ", 30)),
            Err(StockError::EmptyStoreId)
        ));
    }

    #[test]
    fn test_non_positive_transfer_quantity_rejected() {
        assert!(matches!(
            StockService::validate_transfer(&transfer("store001", "store002", 0)),
            Err(StockError::InvalidTransferQuantity(0))
        ));
        assert!(matches!(
            StockService::validate_transfer(&transfer("store001", "store002", -5)),
            Err(StockError::InvalidTransferQuantity(-5))
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(StockService::validate_quantity(0).is_ok());
        assert!(StockService::validate_quantity(100).is_ok());
        assert!(matches!(
            StockService::validate_quantity(-1),
            Err(StockError::InvalidQuantity(-1))
        ));
    }

    #[test]
    fn test_validate_bulk_rejects_any_negative() {
        let adjustments = vec![
            Adjustment { product_id: Uuid::new_v4(), quantity: 10 },
            Adjustment { product_id: Uuid::new_v4(), quantity: -2 },
        ];
        assert!(matches!(
            StockService::validate_bulk(&adjustments),
            Err(StockError::InvalidQuantity(-2))
        ));
    }

    #[test]
    fn test_classify_levels() {
        assert_eq!(StockService::classify(5, 10, 100).unwrap().level, StockLevel::Low);
        assert_eq!(StockService::classify(10, 10, 100).unwrap().level, StockLevel::Normal);
        assert_eq!(StockService::classify(100, 10, 100).unwrap().level, StockLevel::Normal);
        assert_eq!(StockService::classify(101, 10, 100).unwrap().level, StockLevel::Excess);
    }

    #[test]
    fn test_classify_rejects_inverted_thresholds() {
        assert!(matches!(
            StockService::classify(5, 100, 10),
            Err(StockError::InvalidThresholds { min: 100, max: 10 })
        ));
    }

    #[test]
    fn test_is_low_inclusive() {
        assert!(StockService::is_low(20, 20));
        assert!(StockService::is_low(19, 20));
        assert!(!StockService::is_low(21, 20));
    }

    #[test]
    fn test_deficit() {
        assert_eq!(StockService::deficit(5, 20), 15);
        assert_eq!(StockService::deficit(20, 20), 0);
        assert_eq!(StockService::deficit(25, 20), 0);
    }
}
