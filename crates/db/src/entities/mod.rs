//! `SeaORM` entity definitions.

pub mod movements;
pub mod products;
pub mod sea_orm_active_enums;
pub mod stock_records;
