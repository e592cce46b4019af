//! Stock repository for per-(product, store) quantity counters.
//!
//! All mutation goes through two single-statement primitives:
//!
//! - [`apply_delta`] is the atomic conditional increment/decrement. Outbound
//!   deltas are applied as `UPDATE .. SET quantity = quantity + delta
//!   WHERE .. AND quantity >= -delta`; zero rows affected means the
//!   stock was insufficient (or the record absent) and nothing changed.
//!   Inbound deltas upsert via `INSERT .. ON CONFLICT DO UPDATE SET
//!   quantity = quantity + delta`.
//! - [`overwrite_quantity`] is the absolute upsert used by manual adjustment.
//!
//! Neither primitive reads before writing; the condition travels with
//! the statement, which is what keeps concurrent operations on the same
//! key from losing updates or driving the counter negative.

use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::{products, stock_records};

/// Error types for stock counter operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// The conditional decrement affected no row: the record is absent
    /// or holds less stock than requested.
    #[error("Insufficient stock for product {product_id} in store '{store_id}'")]
    InsufficientStock {
        /// The product whose stock was insufficient.
        product_id: Uuid,
        /// The store the stock was requested from.
        store_id: String,
    },

    /// Absolute quantities cannot be negative.
    #[error("Quantity must be a non-negative number, got {0}")]
    InvalidQuantity(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A stock record joined with its product for display.
#[derive(Debug, Clone)]
pub struct StockWithProduct {
    /// The stock record.
    pub record: stock_records::Model,
    /// The product it counts.
    pub product: products::Model,
}

/// Applies a signed delta to one (product, store) counter as a single
/// atomic statement.
///
/// A non-negative delta upserts: the record is created with the given
/// default threshold when absent, incremented otherwise. A negative
/// delta is conditional: it only applies when the resulting quantity
/// stays non-negative, and fails with `InsufficientStock` otherwise
/// without touching the row.
///
/// Generic over [`ConnectionTrait`] so the same primitive runs
/// standalone or inside a multi-entity transaction.
///
/// # Errors
///
/// Returns `InsufficientStock` when a negative delta cannot be applied,
/// or `Database` on storage failure.
pub async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    store_id: &str,
    delta: i32,
    default_min_stock: i32,
) -> Result<(), StockError> {
    if delta >= 0 {
        let now = chrono::Utc::now().into();
        let record = stock_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            store_id: Set(store_id.to_string()),
            quantity: Set(delta),
            min_stock: Set(default_min_stock),
            created_at: Set(now),
            updated_at: Set(now),
        };

        stock_records::Entity::insert(record)
            .on_conflict(
                OnConflict::columns([
                    stock_records::Column::ProductId,
                    stock_records::Column::StoreId,
                ])
                .value(
                    stock_records::Column::Quantity,
                    Expr::col((stock_records::Entity, stock_records::Column::Quantity)).add(delta),
                )
                .value(stock_records::Column::UpdatedAt, Expr::current_timestamp())
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;

        return Ok(());
    }

    let result = stock_records::Entity::update_many()
        .col_expr(
            stock_records::Column::Quantity,
            Expr::col(stock_records::Column::Quantity).add(delta),
        )
        .col_expr(
            stock_records::Column::UpdatedAt,
            Expr::current_timestamp().into(),
        )
        .filter(stock_records::Column::ProductId.eq(product_id))
        .filter(stock_records::Column::StoreId.eq(store_id))
        .filter(stock_records::Column::Quantity.gte(-delta))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(StockError::InsufficientStock {
            product_id,
            store_id: store_id.to_string(),
        });
    }

    Ok(())
}

/// Overwrites one (product, store) counter with an absolute quantity,
/// creating the record when absent.
///
/// # Errors
///
/// Returns `InvalidQuantity` for negative quantities, or `Database` on
/// storage failure.
pub async fn overwrite_quantity<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    store_id: &str,
    quantity: i32,
    min_stock: Option<i32>,
) -> Result<(), StockError> {
    if quantity < 0 {
        return Err(StockError::InvalidQuantity(quantity));
    }

    let now = chrono::Utc::now().into();
    let record = stock_records::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        store_id: Set(store_id.to_string()),
        quantity: Set(quantity),
        min_stock: Set(min_stock.unwrap_or(0)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let mut on_conflict = OnConflict::columns([
        stock_records::Column::ProductId,
        stock_records::Column::StoreId,
    ]);
    on_conflict.update_columns([
        stock_records::Column::Quantity,
        stock_records::Column::UpdatedAt,
    ]);
    if min_stock.is_some() {
        on_conflict.update_column(stock_records::Column::MinStock);
    }

    stock_records::Entity::insert(record)
        .on_conflict(on_conflict)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

/// Stock repository for counter reads and writes.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the quantity for a (product, store) pair. Absence means
    /// zero stock, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_quantity(&self, product_id: Uuid, store_id: &str) -> Result<i32, StockError> {
        let record = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(product_id))
            .filter(stock_records::Column::StoreId.eq(store_id))
            .one(&self.db)
            .await?;

        Ok(record.map_or(0, |r| r.quantity))
    }

    /// Finds the full stock record for a (product, store) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_record(
        &self,
        product_id: Uuid,
        store_id: &str,
    ) -> Result<Option<stock_records::Model>, StockError> {
        let record = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(product_id))
            .filter(stock_records::Column::StoreId.eq(store_id))
            .one(&self.db)
            .await?;

        Ok(record)
    }

    /// Overwrites a counter with an absolute quantity (upsert).
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for negative quantities.
    pub async fn set_quantity(
        &self,
        product_id: Uuid,
        store_id: &str,
        quantity: i32,
        min_stock: Option<i32>,
    ) -> Result<(), StockError> {
        overwrite_quantity(&self.db, product_id, store_id, quantity, min_stock).await
    }

    /// Applies a signed delta atomically, upserting on inbound deltas
    /// with the given default threshold.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when a negative delta would drive the
    /// counter below zero.
    pub async fn increment(
        &self,
        product_id: Uuid,
        store_id: &str,
        delta: i32,
        default_min_stock: i32,
    ) -> Result<(), StockError> {
        apply_delta(&self.db, product_id, store_id, delta, default_min_stock).await
    }

    /// Lists all stock for one store, joined with product metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_store(&self, store_id: &str) -> Result<Vec<StockWithProduct>, StockError> {
        let rows = stock_records::Entity::find()
            .find_also_related(products::Entity)
            .filter(stock_records::Column::StoreId.eq(store_id))
            .order_by_asc(stock_records::Column::ProductId)
            .all(&self.db)
            .await?;

        Ok(join_products(rows))
    }

    /// Lists all stock records, joined with product metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<StockWithProduct>, StockError> {
        let rows = stock_records::Entity::find()
            .find_also_related(products::Entity)
            .order_by_asc(stock_records::Column::StoreId)
            .order_by_asc(stock_records::Column::ProductId)
            .all(&self.db)
            .await?;

        Ok(join_products(rows))
    }

    /// Lists records at or below a threshold, joined with product
    /// metadata. With no explicit threshold, each record is compared
    /// against its own configured `min_stock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_low(&self, threshold: Option<i32>) -> Result<Vec<StockWithProduct>, StockError> {
        let mut query = stock_records::Entity::find().find_also_related(products::Entity);

        query = match threshold {
            Some(limit) => query.filter(stock_records::Column::Quantity.lte(limit)),
            None => query.filter(
                Expr::col((stock_records::Entity, stock_records::Column::Quantity)).lte(Expr::col(
                    (stock_records::Entity, stock_records::Column::MinStock),
                )),
            ),
        };

        let rows = query
            .order_by_asc(stock_records::Column::StoreId)
            .order_by_asc(stock_records::Column::ProductId)
            .all(&self.db)
            .await?;

        Ok(join_products(rows))
    }
}

/// Drops rows whose product join came back empty. The FK makes that
/// impossible in practice; rows are not worth failing the listing over.
fn join_products(
    rows: Vec<(stock_records::Model, Option<products::Model>)>,
) -> Vec<StockWithProduct> {
    rows.into_iter()
        .filter_map(|(record, product)| product.map(|product| StockWithProduct { record, product }))
        .collect()
}
