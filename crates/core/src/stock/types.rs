//! Stock domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a stock quantity against caller-supplied thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// Quantity is below the minimum threshold.
    Low,
    /// Quantity is within thresholds.
    Normal,
    /// Quantity is above the maximum threshold.
    Excess,
}

impl StockLevel {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Excess => "excess",
        }
    }
}

/// Result of classifying a quantity, with the thresholds echoed back
/// for caller display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StockLevelReport {
    /// The quantity that was classified.
    pub quantity: i32,
    /// The minimum threshold used.
    pub min_threshold: i32,
    /// The maximum threshold used.
    pub max_threshold: i32,
    /// The classification.
    pub level: StockLevel,
}

/// A request to move stock between two stores.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// The product being transferred.
    pub product_id: Uuid,
    /// The store the stock leaves.
    pub source_store_id: String,
    /// The store the stock arrives at.
    pub target_store_id: String,
    /// Units to move. Must be positive.
    pub quantity: i32,
}

/// A manual overwrite of one product's quantity.
#[derive(Debug, Clone, Copy)]
pub struct Adjustment {
    /// The product being adjusted.
    pub product_id: Uuid,
    /// The new absolute quantity. Must be non-negative.
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_strings() {
        assert_eq!(StockLevel::Low.as_str(), "low");
        assert_eq!(StockLevel::Normal.as_str(), "normal");
        assert_eq!(StockLevel::Excess.as_str(), "excess");
    }
}
