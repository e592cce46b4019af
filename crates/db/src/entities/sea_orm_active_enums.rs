//! `SeaORM` active enum definitions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Movement type stored in the `movement_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_type")]
pub enum MovementType {
    /// Inbound stock: initial inventory or restocking.
    #[sea_orm(string_value = "in")]
    In,
    /// Outbound stock: removal or sale.
    #[sea_orm(string_value = "out")]
    Out,
    /// Movement between two stores.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl From<stockroom_core::movement::MovementType> for MovementType {
    fn from(value: stockroom_core::movement::MovementType) -> Self {
        match value {
            stockroom_core::movement::MovementType::In => Self::In,
            stockroom_core::movement::MovementType::Out => Self::Out,
            stockroom_core::movement::MovementType::Transfer => Self::Transfer,
        }
    }
}

impl From<MovementType> for stockroom_core::movement::MovementType {
    fn from(value: MovementType) -> Self {
        match value {
            MovementType::In => Self::In,
            MovementType::Out => Self::Out,
            MovementType::Transfer => Self::Transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_round_trip() {
        for core_type in [
            stockroom_core::movement::MovementType::In,
            stockroom_core::movement::MovementType::Out,
            stockroom_core::movement::MovementType::Transfer,
        ] {
            let db_type: MovementType = core_type.into();
            let back: stockroom_core::movement::MovementType = db_type.into();
            assert_eq!(core_type, back);
        }
    }
}
