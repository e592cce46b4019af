//! Property-based tests for stock classification and low-stock rules.

use proptest::prelude::*;
use uuid::Uuid;

use super::service::StockService;
use super::types::{StockLevel, TransferRequest};

/// Strategy for quantities in a realistic range.
fn quantity() -> impl Strategy<Value = i32> {
    0i32..1_000_000
}

/// Strategy for ordered (min, max) threshold pairs.
fn thresholds() -> impl Strategy<Value = (i32, i32)> {
    (0i32..10_000, 0i32..10_000).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Classification covers exactly one level, consistent with the
    /// threshold comparison used to produce it.
    #[test]
    fn prop_classification_matches_thresholds(
        quantity in quantity(),
        (min, max) in thresholds(),
    ) {
        let report = StockService::classify(quantity, min, max).unwrap();

        match report.level {
            StockLevel::Low => prop_assert!(quantity < min),
            StockLevel::Excess => prop_assert!(quantity > max),
            StockLevel::Normal => prop_assert!(quantity >= min && quantity <= max),
        }

        // Thresholds are echoed back unchanged for caller display.
        prop_assert_eq!(report.min_threshold, min);
        prop_assert_eq!(report.max_threshold, max);
        prop_assert_eq!(report.quantity, quantity);
    }

    /// Inverted thresholds never classify.
    #[test]
    fn prop_inverted_thresholds_rejected(
        quantity in quantity(),
        (min, max) in thresholds(),
    ) {
        prop_assume!(min < max);
        prop_assert!(StockService::classify(quantity, max, min).is_err());
    }

    /// The deficit is never negative, and is zero exactly when the
    /// quantity meets its threshold.
    #[test]
    fn prop_deficit_non_negative(
        quantity in quantity(),
        min_stock in 0i32..10_000,
    ) {
        let deficit = StockService::deficit(quantity, min_stock);
        prop_assert!(deficit >= 0);
        prop_assert_eq!(deficit == 0, quantity >= min_stock);
        if deficit > 0 {
            prop_assert_eq!(quantity + deficit, min_stock);
        }
    }

    /// Low-stock detection is inclusive at the threshold and agrees
    /// with the deficit calculation except exactly at equality.
    #[test]
    fn prop_is_low_inclusive(
        quantity in quantity(),
        min_stock in 0i32..10_000,
    ) {
        prop_assert_eq!(StockService::is_low(quantity, min_stock), quantity <= min_stock);
    }

    /// A transfer request is accepted iff stores differ, are non-blank,
    /// and the quantity is positive.
    #[test]
    fn prop_transfer_validation(
        quantity in -100i32..1_000,
        source in "[a-z]{4,8}",
        target in "[a-z]{4,8}",
    ) {
        let request = TransferRequest {
            product_id: Uuid::new_v4(),
            source_store_id: source.clone(),
            target_store_id: target.clone(),
            quantity,
        };
        let accepted = StockService::validate_transfer(&request).is_ok();
        prop_assert_eq!(accepted, source != target && quantity > 0);
    }
}
