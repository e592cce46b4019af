//! Movement ledger repository.
//!
//! The ledger is append-only: this module exposes insert and read
//! projections, never an update or delete. `record_movement` is the
//! coordinated IN/OUT path: ledger append plus the signed stock delta
//! run inside one database transaction, so a rejected delta rolls the
//! append back and the two never diverge.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use stockroom_core::movement::{
    MovementDraft, MovementError, MovementMetadata, MovementService, MovementType,
};

use crate::entities::{movements, products};
use crate::repositories::stock::{self, StockError};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Movement draft failed pure validation.
    #[error(transparent)]
    Validation(#[from] MovementError),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Movement not found.
    #[error("Movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Not enough stock to apply an OUT movement.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested by the movement.
        requested: i32,
        /// Units actually available.
        available: i32,
    },

    /// TRANSFER movements carry a debit/credit pair and are recorded by
    /// the stock transfer operation, never directly.
    #[error("TRANSFER movements are recorded by the stock transfer operation")]
    TransferNotDirect,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(inner) => inner.error_code(),
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::MovementNotFound(_) => "MOVEMENT_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::TransferNotDirect => "INVALID_MOVEMENT_TYPE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(inner) => inner.http_status_code(),
            Self::TransferNotDirect => 400,
            Self::ProductNotFound(_) | Self::MovementNotFound(_) => 404,
            Self::InsufficientStock { .. } => 409,
            Self::Database(_) => 500,
        }
    }
}

/// Validates a draft and appends it to the ledger.
///
/// Assigns the event timestamp when the draft carries none. Generic
/// over [`ConnectionTrait`] so coordinated operations can append inside
/// their own transaction.
///
/// # Errors
///
/// Returns `Validation` when the draft breaks a movement rule, or
/// `Database` on storage failure.
pub async fn append<C: ConnectionTrait>(
    conn: &C,
    draft: MovementDraft,
) -> Result<movements::Model, LedgerError> {
    MovementService::validate(&draft)?;

    let now = Utc::now();
    let movement = movements::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(draft.product_id),
        movement_type: Set(draft.movement_type.into()),
        quantity: Set(draft.quantity),
        source_store_id: Set(draft.source_store_id),
        target_store_id: Set(draft.target_store_id),
        reference: Set(draft.metadata.reference),
        notes: Set(draft.metadata.notes),
        unit_price: Set(draft.metadata.unit_price),
        moved_at: Set(draft.moved_at.unwrap_or(now).into()),
        created_at: Set(now.into()),
    };

    let movement = movement.insert(conn).await?;
    Ok(movement)
}

/// Movement repository: ledger appends, read projections, and the
/// coordinated IN/OUT recording path.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
    default_store_id: String,
}

impl MovementRepository {
    /// Creates a new movement repository acting on the given implicit
    /// store for product-scoped movements.
    #[must_use]
    pub const fn new(db: DatabaseConnection, default_store_id: String) -> Self {
        Self {
            db,
            default_store_id,
        }
    }

    /// Records an IN or OUT movement against the implicit store:
    /// validates the draft and the product, appends to the ledger and
    /// applies the signed delta to stock, all in one transaction.
    ///
    /// The OUT path pre-reads the available quantity for a precise
    /// error message, but correctness rests on the conditional
    /// decrement: a concurrent OUT that empties the stock first makes
    /// the decrement affect zero rows and the whole operation roll
    /// back, ledger entry included.
    ///
    /// # Errors
    ///
    /// Returns `TransferNotDirect` for TRANSFER, `ProductNotFound`,
    /// `InsufficientStock` for an uncovered OUT, `Validation` for a bad
    /// draft.
    pub async fn record_movement(
        &self,
        product_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        metadata: MovementMetadata,
    ) -> Result<movements::Model, LedgerError> {
        let draft = match movement_type {
            MovementType::In => MovementDraft::inbound(product_id, &*self.default_store_id, quantity),
            MovementType::Out => {
                MovementDraft::outbound(product_id, &*self.default_store_id, quantity)
            }
            MovementType::Transfer => return Err(LedgerError::TransferNotDirect),
        }
        .with_metadata(metadata);

        MovementService::validate(&draft)?;

        let txn = self.db.begin().await?;

        products::Entity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or(LedgerError::ProductNotFound(product_id))?;

        if movement_type == MovementType::Out {
            let available = current_quantity(&txn, product_id, &self.default_store_id).await?;
            if available < quantity {
                return Err(LedgerError::InsufficientStock {
                    requested: quantity,
                    available,
                });
            }
        }

        let movement = append(&txn, draft).await?;

        let delta = movement_type.signed_delta(quantity);
        match stock::apply_delta(&txn, product_id, &self.default_store_id, delta, 0).await {
            Ok(()) => {}
            Err(StockError::InsufficientStock { .. }) => {
                // Lost a race against a concurrent OUT after the
                // pre-read; the transaction drops, taking the ledger
                // append with it.
                tracing::warn!(
                    %product_id,
                    store_id = %self.default_store_id,
                    requested = quantity,
                    "concurrent update won the stock; movement rolled back"
                );
                let available = current_quantity(&self.db, product_id, &self.default_store_id).await?;
                return Err(LedgerError::InsufficientStock {
                    requested: quantity,
                    available,
                });
            }
            Err(StockError::Database(e)) => return Err(e.into()),
            Err(StockError::InvalidQuantity(q)) => {
                return Err(MovementError::InvalidQuantity(q).into());
            }
        }

        txn.commit().await?;
        Ok(movement)
    }

    /// Gets a movement by ID.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` when absent.
    pub async fn get_movement(&self, id: Uuid) -> Result<movements::Model, LedgerError> {
        let movement = movements::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::MovementNotFound(id))?;

        Ok(movement)
    }

    /// Lists all movements, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<movements::Model>, LedgerError> {
        let movements = movements::Entity::find()
            .order_by_desc(movements::Column::MovedAt)
            .all(&self.db)
            .await?;

        Ok(movements)
    }

    /// Lists movements for one product, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<movements::Model>, LedgerError> {
        let movements = movements::Entity::find()
            .filter(movements::Column::ProductId.eq(product_id))
            .order_by_desc(movements::Column::MovedAt)
            .all(&self.db)
            .await?;

        Ok(movements)
    }

    /// Lists movements of one type, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_type(
        &self,
        movement_type: MovementType,
    ) -> Result<Vec<movements::Model>, LedgerError> {
        let db_type: crate::entities::sea_orm_active_enums::MovementType = movement_type.into();
        let movements = movements::Entity::find()
            .filter(movements::Column::MovementType.eq(db_type))
            .order_by_desc(movements::Column::MovedAt)
            .all(&self.db)
            .await?;

        Ok(movements)
    }

    /// Lists movements whose event timestamp falls in the inclusive
    /// range, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<movements::Model>, LedgerError> {
        let movements = movements::Entity::find()
            .filter(movements::Column::MovedAt.gte(from))
            .filter(movements::Column::MovedAt.lte(to))
            .order_by_desc(movements::Column::MovedAt)
            .all(&self.db)
            .await?;

        Ok(movements)
    }
}

/// Reads the current quantity at a (product, store) key on any
/// connection; absence reads as zero.
async fn current_quantity<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    store_id: &str,
) -> Result<i32, DbErr> {
    use crate::entities::stock_records;

    let record = stock_records::Entity::find()
        .filter(stock_records::Column::ProductId.eq(product_id))
        .filter(stock_records::Column::StoreId.eq(store_id))
        .one(conn)
        .await?;

    Ok(record.map_or(0, |r| r.quantity))
}
