//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Each repository owns a connection handle passed in at
//! construction time; there is no ambient global client.

pub mod inventory;
pub mod movement;
pub mod product;
pub mod stock;

pub use inventory::{
    InventoryError, InventoryRepository, LowStockAlert, NewInventory, ProductStock,
};
pub use movement::{LedgerError, MovementRepository};
pub use product::{ProductError, ProductRepository, UpdateOutcome};
pub use stock::{StockError, StockRepository, StockWithProduct};
