//! Movement domain types.
//!
//! A movement is an immutable record of a stock-affecting event. Once
//! written to the ledger it is a historical fact; nothing in this
//! workspace updates or deletes one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MovementError;

/// Movement type: the closed set of stock-affecting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Inbound stock: initial inventory or restocking.
    In,
    /// Outbound stock: removal or sale.
    Out,
    /// Movement between two stores.
    Transfer,
}

impl MovementType {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Returns the net stock change this movement applies at its
    /// product-scoped store: positive for IN, negative for OUT.
    ///
    /// A TRANSFER nets to zero across stores; its per-store deltas are
    /// the debit/credit pair applied by the transfer operation itself.
    #[must_use]
    pub const fn signed_delta(self, quantity: i32) -> i32 {
        match self {
            Self::In => quantity,
            Self::Out => -quantity,
            Self::Transfer => 0,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementType {
    type Err = MovementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(MovementError::InvalidType(other.to_string())),
        }
    }
}

/// Optional descriptive metadata attached to a movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementMetadata {
    /// External reference (order number, delivery note).
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Unit price at the time of the movement.
    pub unit_price: Option<Decimal>,
}

/// A movement awaiting validation and ledger append.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    /// The product being moved. Must reference an existing product at
    /// append time.
    pub product_id: Uuid,
    /// The kind of movement.
    pub movement_type: MovementType,
    /// Units moved. Must be positive.
    pub quantity: i32,
    /// Originating store. None for IN movements.
    pub source_store_id: Option<String>,
    /// Receiving store. None for OUT movements.
    pub target_store_id: Option<String>,
    /// Optional descriptive metadata.
    pub metadata: MovementMetadata,
    /// Event timestamp; assigned at append time when absent.
    pub moved_at: Option<DateTime<Utc>>,
}

impl MovementDraft {
    /// Builds an inbound movement into the given store.
    #[must_use]
    pub fn inbound(product_id: Uuid, target_store_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id,
            movement_type: MovementType::In,
            quantity,
            source_store_id: None,
            target_store_id: Some(target_store_id.into()),
            metadata: MovementMetadata::default(),
            moved_at: None,
        }
    }

    /// Builds an outbound movement from the given store.
    #[must_use]
    pub fn outbound(product_id: Uuid, source_store_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id,
            movement_type: MovementType::Out,
            quantity,
            source_store_id: Some(source_store_id.into()),
            target_store_id: None,
            metadata: MovementMetadata::default(),
            moved_at: None,
        }
    }

    /// Builds a transfer movement between two stores.
    #[must_use]
    pub fn transfer(
        product_id: Uuid,
        source_store_id: impl Into<String>,
        target_store_id: impl Into<String>,
        quantity: i32,
    ) -> Self {
        Self {
            product_id,
            movement_type: MovementType::Transfer,
            quantity,
            source_store_id: Some(source_store_id.into()),
            target_store_id: Some(target_store_id.into()),
            metadata: MovementMetadata::default(),
            moved_at: None,
        }
    }

    /// Attaches descriptive metadata to the draft.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MovementMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_round_trip_strings() {
        assert_eq!(MovementType::In.as_str(), "IN");
        assert_eq!(MovementType::Out.as_str(), "OUT");
        assert_eq!(MovementType::Transfer.as_str(), "TRANSFER");
    }

    #[test]
    fn test_movement_type_parse_rejects_unknown() {
        assert!("RESTOCK".parse::<MovementType>().is_err());
        // Lowercase is not accepted at the boundary.
        assert!("in".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(MovementType::In.signed_delta(5), 5);
        assert_eq!(MovementType::Out.signed_delta(5), -5);
        assert_eq!(MovementType::Transfer.signed_delta(5), 0);
    }

    #[test]
    fn test_inbound_draft_shape() {
        let draft = MovementDraft::inbound(Uuid::new_v4(), "store001", 10);
        assert_eq!(draft.movement_type, MovementType::In);
        assert!(draft.source_store_id.is_none());
        assert_eq!(draft.target_store_id.as_deref(), Some("store001"));
    }
}
