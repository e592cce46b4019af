//! Movement validation service.
//!
//! Validates movement drafts before they are appended to the ledger.
//! This service contains pure business logic with no database
//! dependencies; product existence and stock sufficiency are checked by
//! the storage layer at append time.

use rust_decimal::Decimal;

use super::error::MovementError;
use super::types::{MovementDraft, MovementType};

/// Movement validation service.
pub struct MovementService;

impl MovementService {
    /// Validates a movement draft.
    ///
    /// Checks, in order:
    /// 1. Quantity is positive
    /// 2. Store fields match the movement type (IN has no source, OUT
    ///    has no target, TRANSFER has both and they differ)
    /// 3. Unit price metadata, when present, is non-negative
    ///
    /// # Errors
    ///
    /// Returns `MovementError` describing the first violated rule.
    pub fn validate(draft: &MovementDraft) -> Result<(), MovementError> {
        if draft.quantity <= 0 {
            return Err(MovementError::InvalidQuantity(draft.quantity));
        }

        match draft.movement_type {
            MovementType::In => {
                if draft.source_store_id.is_some() {
                    return Err(MovementError::SourceNotAllowed);
                }
            }
            MovementType::Out => {
                if draft.target_store_id.is_some() {
                    return Err(MovementError::TargetNotAllowed);
                }
            }
            MovementType::Transfer => match (&draft.source_store_id, &draft.target_store_id) {
                (Some(source), Some(target)) => {
                    if source == target {
                        return Err(MovementError::SameStoreTransfer);
                    }
                }
                _ => return Err(MovementError::TransferStoresRequired),
            },
        }

        if let Some(unit_price) = draft.metadata.unit_price {
            if unit_price < Decimal::ZERO {
                return Err(MovementError::NegativeUnitPrice(unit_price));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_valid_inbound() {
        let draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 10);
        assert!(MovementService::validate(&draft).is_ok());
    }

    #[test]
    fn test_valid_outbound() {
        let draft = MovementDraft::outbound(Uuid::new_v4(), "store001", 3);
        assert!(MovementService::validate(&draft).is_ok());
    }

    #[test]
    fn test_valid_transfer() {
        let draft = MovementDraft::transfer(Uuid::new_v4(), "store001", "store002", 5);
        assert!(MovementService::validate(&draft).is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 0);
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let draft = MovementDraft::outbound(Uuid::new_v4(), "store001", -4);
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::InvalidQuantity(-4))
        ));
    }

    #[test]
    fn test_inbound_with_source_rejected() {
        let mut draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 10);
        draft.source_store_id = Some("store002".to_string());
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::SourceNotAllowed)
        ));
    }

    #[test]
    fn test_outbound_with_target_rejected() {
        let mut draft = MovementDraft::outbound(Uuid::new_v4(), "store001", 10);
        draft.target_store_id = Some("store002".to_string());
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::TargetNotAllowed)
        ));
    }

    #[test]
    fn test_transfer_missing_stores_rejected() {
        let mut draft = MovementDraft::transfer(Uuid::new_v4(), "store001", "store002", 10);
        draft.target_store_id = None;
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::TransferStoresRequired)
        ));
    }

    #[test]
    fn test_transfer_same_store_rejected() {
        let draft = MovementDraft::transfer(Uuid::new_v4(), "store001", "store001", 10);
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::SameStoreTransfer)
        ));
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let mut draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 10);
        draft.metadata.unit_price = Some(dec!(-1.50));
        assert!(matches!(
            MovementService::validate(&draft),
            Err(MovementError::NegativeUnitPrice(_))
        ));
    }

    #[test]
    fn test_unit_price_zero_allowed() {
        let mut draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 10);
        draft.metadata.unit_price = Some(dec!(0));
        assert!(MovementService::validate(&draft).is_ok());
    }
}
