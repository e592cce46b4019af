//! Product catalog domain logic.
//!
//! Field-level validation for product creation and partial updates.
//! SKU uniqueness is a storage-level rule and lives with the product
//! repository; everything here is pure.

pub mod error;
pub mod service;
pub mod types;

pub use error::CatalogError;
pub use service::CatalogService;
pub use types::{NewProduct, ProductPatch};
