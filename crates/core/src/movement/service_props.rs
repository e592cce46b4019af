//! Property-based tests for movement validation and signed deltas.

use proptest::prelude::*;
use uuid::Uuid;

use super::service::MovementService;
use super::types::{MovementDraft, MovementType};

/// Strategy for positive quantities.
fn positive_quantity() -> impl Strategy<Value = i32> {
    1i32..1_000_000
}

/// Strategy for non-positive quantities.
fn non_positive_quantity() -> impl Strategy<Value = i32> {
    -1_000_000i32..=0
}

/// Strategy for short store labels.
fn store_id() -> impl Strategy<Value = String> {
    "[a-z]{3,8}[0-9]{1,3}"
}

/// Strategy for movement types.
fn movement_type() -> impl Strategy<Value = MovementType> {
    prop_oneof![
        Just(MovementType::In),
        Just(MovementType::Out),
        Just(MovementType::Transfer),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any draft built through the typed constructors with a positive
    /// quantity and distinct stores passes validation.
    #[test]
    fn prop_constructed_drafts_validate(
        quantity in positive_quantity(),
        source in store_id(),
        target in store_id(),
    ) {
        prop_assume!(source != target);
        let product_id = Uuid::new_v4();

        prop_assert!(MovementService::validate(
            &MovementDraft::inbound(product_id, source.clone(), quantity)
        ).is_ok());
        prop_assert!(MovementService::validate(
            &MovementDraft::outbound(product_id, source.clone(), quantity)
        ).is_ok());
        prop_assert!(MovementService::validate(
            &MovementDraft::transfer(product_id, source, target, quantity)
        ).is_ok());
    }

    /// A non-positive quantity is rejected regardless of movement type,
    /// so a rejected movement can never change stock.
    #[test]
    fn prop_non_positive_quantity_always_rejected(
        quantity in non_positive_quantity(),
        movement_type in movement_type(),
        source in store_id(),
        target in store_id(),
    ) {
        prop_assume!(source != target);
        let product_id = Uuid::new_v4();
        let draft = match movement_type {
            MovementType::In => MovementDraft::inbound(product_id, target, quantity),
            MovementType::Out => MovementDraft::outbound(product_id, source, quantity),
            MovementType::Transfer => {
                MovementDraft::transfer(product_id, source, target, quantity)
            }
        };
        prop_assert!(MovementService::validate(&draft).is_err());
    }

    /// A transfer from a store to itself is always rejected.
    #[test]
    fn prop_same_store_transfer_rejected(
        quantity in positive_quantity(),
        store in store_id(),
    ) {
        let draft = MovementDraft::transfer(Uuid::new_v4(), store.clone(), store, quantity);
        prop_assert!(MovementService::validate(&draft).is_err());
    }

    /// IN and OUT deltas for the same quantity cancel exactly: applying
    /// an inbound movement and then an outbound movement of the same
    /// size leaves the net stock change at zero.
    #[test]
    fn prop_in_out_deltas_cancel(quantity in positive_quantity()) {
        let inbound = MovementType::In.signed_delta(quantity);
        let outbound = MovementType::Out.signed_delta(quantity);
        prop_assert_eq!(inbound + outbound, 0);
    }

    /// The delta magnitude always equals the quantity for IN and OUT,
    /// and is zero for TRANSFER (a transfer nets to zero across stores).
    #[test]
    fn prop_delta_magnitude(quantity in positive_quantity()) {
        prop_assert_eq!(MovementType::In.signed_delta(quantity).abs(), quantity);
        prop_assert_eq!(MovementType::Out.signed_delta(quantity).abs(), quantity);
        prop_assert_eq!(MovementType::Transfer.signed_delta(quantity), 0);
    }
}
