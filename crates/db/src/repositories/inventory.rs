//! Inventory coordination repository.
//!
//! Composes the catalog, the stock counters and the movement ledger
//! into multi-entity operations that never leave them diverged: every
//! mutation + ledger append pair runs inside one database transaction,
//! and every stock decrement goes through the conditional update in
//! [`crate::repositories::stock`].

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use stockroom_core::movement::{MovementDraft, MovementMetadata};
use stockroom_core::stock::{
    Adjustment, StockError as StockRule, StockLevelReport, StockService, TransferRequest,
};

use stockroom_shared::InventorySettings;

use crate::entities::{products, stock_records};
use crate::repositories::movement::{self, LedgerError};
use crate::repositories::stock::{self, StockError, StockRepository, StockWithProduct};

/// Error types for coordinated inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Inventory is initialized at most once per (product, store).
    #[error("Inventory already exists for this product and store")]
    InventoryExists {
        /// The product already initialized.
        product_id: Uuid,
        /// The store it was initialized in.
        store_id: String,
    },

    /// Not enough stock in the source store.
    #[error("Insufficient stock in source store: requested {requested}, available {available}")]
    InsufficientStock {
        /// The store the stock was requested from.
        store_id: String,
        /// Units requested.
        requested: i32,
        /// Units actually available.
        available: i32,
    },

    /// A pure stock rule was violated.
    #[error(transparent)]
    Validation(#[from] StockRule),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::InventoryExists { .. } => "INVENTORY_EXISTS",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::Validation(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ProductNotFound(_) => 404,
            Self::InventoryExists { .. } | Self::InsufficientStock { .. } => 409,
            Self::Validation(inner) => inner.http_status_code(),
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

/// Input for initializing inventory for a product in a store.
#[derive(Debug, Clone)]
pub struct NewInventory {
    /// The product to initialize.
    pub product_id: Uuid,
    /// The store to initialize it in.
    pub store_id: String,
    /// Initial quantity (non-negative).
    pub quantity: i32,
    /// Low-stock threshold (non-negative).
    pub min_stock: i32,
}

/// Total stock for one product with its per-store breakdown.
#[derive(Debug, Clone)]
pub struct ProductStock {
    /// The product.
    pub product: products::Model,
    /// Sum over all stores.
    pub total: i64,
    /// Per-store quantities.
    pub per_store: Vec<stock_records::Model>,
}

/// A low-stock row joined with its product and computed deficit.
#[derive(Debug, Clone)]
pub struct LowStockAlert {
    /// The stock record and product.
    pub stock: StockWithProduct,
    /// Units missing to reach the configured threshold.
    pub deficit: i32,
}

/// Inventory coordination repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
    settings: InventorySettings,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, settings: InventorySettings) -> Self {
        Self { db, settings }
    }

    /// Initializes inventory for a product in a store and records the
    /// initial IN movement, in one transaction.
    ///
    /// A zero quantity initializes the record (threshold only) without
    /// a ledger entry, since movements are strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, `InventoryExists`, or `Validation`
    /// for negative quantity/threshold.
    pub async fn create_inventory(
        &self,
        input: NewInventory,
    ) -> Result<stock_records::Model, InventoryError> {
        StockService::validate_quantity(input.quantity)?;
        StockService::validate_quantity(input.min_stock)?;
        if input.store_id.trim().is_empty() {
            return Err(StockRule::EmptyStoreId.into());
        }

        let txn = self.db.begin().await?;

        products::Entity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or(InventoryError::ProductNotFound(input.product_id))?;

        let existing = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(input.product_id))
            .filter(stock_records::Column::StoreId.eq(&input.store_id))
            .one(&txn)
            .await?;

        if existing.is_some() {
            return Err(InventoryError::InventoryExists {
                product_id: input.product_id,
                store_id: input.store_id,
            });
        }

        let now = chrono::Utc::now().into();
        let record = stock_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            store_id: Set(input.store_id.clone()),
            quantity: Set(input.quantity),
            min_stock: Set(input.min_stock),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let record = record.insert(&txn).await?;

        if input.quantity > 0 {
            let draft =
                MovementDraft::inbound(input.product_id, &*input.store_id, input.quantity);
            movement::append(&txn, draft)
                .await
                .map_err(flatten_ledger_error)?;
        }

        txn.commit().await?;
        Ok(record)
    }

    /// Moves stock between two stores and records the TRANSFER, in one
    /// transaction.
    ///
    /// The debit re-validates sufficiency at mutation time: the
    /// conditional decrement affecting zero rows aborts the whole
    /// operation, so a concurrent transfer can never drive the source
    /// negative or leave a movement without its stock change.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for same-store or non-positive requests,
    /// `InsufficientStock` when the source cannot cover the quantity.
    pub async fn transfer_stock(&self, request: TransferRequest) -> Result<(), InventoryError> {
        StockService::validate_transfer(&request)?;

        let txn = self.db.begin().await?;

        let source = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(request.product_id))
            .filter(stock_records::Column::StoreId.eq(&request.source_store_id))
            .one(&txn)
            .await?
            .ok_or_else(|| InventoryError::InsufficientStock {
                store_id: request.source_store_id.clone(),
                requested: request.quantity,
                available: 0,
            })?;

        if source.quantity < request.quantity {
            return Err(InventoryError::InsufficientStock {
                store_id: request.source_store_id.clone(),
                requested: request.quantity,
                available: source.quantity,
            });
        }

        // Debit the source. Re-validated by the statement itself; the
        // pre-read above only makes the error message precise.
        match stock::apply_delta(
            &txn,
            request.product_id,
            &request.source_store_id,
            -request.quantity,
            0,
        )
        .await
        {
            Ok(()) => {}
            Err(StockError::InsufficientStock { .. }) => {
                tracing::warn!(
                    product_id = %request.product_id,
                    store_id = %request.source_store_id,
                    requested = request.quantity,
                    "concurrent update won the source stock; transfer aborted"
                );
                return Err(InventoryError::InsufficientStock {
                    store_id: request.source_store_id.clone(),
                    requested: request.quantity,
                    available: source.quantity,
                });
            }
            Err(other) => return Err(map_stock_error(other)),
        }

        // Credit the target, seeding a new record with the source's
        // threshold.
        stock::apply_delta(
            &txn,
            request.product_id,
            &request.target_store_id,
            request.quantity,
            source.min_stock,
        )
        .await
        .map_err(map_stock_error)?;

        let draft = MovementDraft::transfer(
            request.product_id,
            &*request.source_store_id,
            &*request.target_store_id,
            request.quantity,
        );
        movement::append(&txn, draft)
            .await
            .map_err(flatten_ledger_error)?;

        txn.commit().await?;
        Ok(())
    }

    /// Manually overwrites a product's quantity at the implicit store.
    ///
    /// When adjustment logging is enabled, the change is additionally
    /// recorded as a compensating IN or OUT movement for the absolute
    /// difference, in the same transaction. With logging off (the
    /// default) the overwrite leaves no ledger trace: adjustments are
    /// corrections, not tracked events.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `Validation` for a negative
    /// quantity.
    pub async fn adjust_stock(&self, product_id: Uuid, quantity: i32) -> Result<(), InventoryError> {
        StockService::validate_quantity(quantity)?;

        let txn = self.db.begin().await?;

        products::Entity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        let store_id = self.settings.default_store_id.as_str();

        if self.settings.log_adjustments {
            let previous = stock_records::Entity::find()
                .filter(stock_records::Column::ProductId.eq(product_id))
                .filter(stock_records::Column::StoreId.eq(store_id))
                .one(&txn)
                .await?
                .map_or(0, |r| r.quantity);

            stock::overwrite_quantity(&txn, product_id, store_id, quantity, None)
                .await
                .map_err(map_stock_error)?;

            let diff = quantity - previous;
            if diff != 0 {
                let mut draft = if diff > 0 {
                    MovementDraft::inbound(product_id, store_id, diff)
                } else {
                    MovementDraft::outbound(product_id, store_id, -diff)
                };
                draft.metadata = MovementMetadata {
                    notes: Some("Manual stock adjustment".to_string()),
                    ..MovementMetadata::default()
                };
                movement::append(&txn, draft)
                    .await
                    .map_err(flatten_ledger_error)?;
            }
        } else {
            stock::overwrite_quantity(&txn, product_id, store_id, quantity, None)
                .await
                .map_err(map_stock_error)?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Applies a batch of absolute adjustments at the implicit store,
    /// all or nothing.
    ///
    /// Every product must exist and every quantity be non-negative
    /// before anything is written; the batch then lands as one upsert
    /// in one transaction. Duplicate product ids collapse last-wins,
    /// matching the net effect of applying them in order.
    ///
    /// Returns the number of counters written.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `ProductNotFound`; in both cases zero
    /// mutations are applied.
    pub async fn bulk_adjust(&self, adjustments: &[Adjustment]) -> Result<u64, InventoryError> {
        StockService::validate_bulk(adjustments)?;

        if adjustments.is_empty() {
            return Ok(0);
        }

        let mut collapsed: HashMap<Uuid, i32> = HashMap::new();
        for adjustment in adjustments {
            collapsed.insert(adjustment.product_id, adjustment.quantity);
        }
        let ids: Vec<Uuid> = collapsed.keys().copied().collect();

        let txn = self.db.begin().await?;

        let found: Vec<Uuid> = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.clone()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
            return Err(InventoryError::ProductNotFound(*missing));
        }

        let store_id = self.settings.default_store_id.as_str();
        for (product_id, quantity) in &collapsed {
            stock::overwrite_quantity(&txn, *product_id, store_id, *quantity, None)
                .await
                .map_err(map_stock_error)?;
        }

        txn.commit().await?;
        Ok(collapsed.len() as u64)
    }

    /// Classifies a product's quantity at the implicit store against
    /// caller-supplied thresholds. Pure read.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `Validation` for inverted
    /// thresholds.
    pub async fn validate_stock_level(
        &self,
        product_id: Uuid,
        min_threshold: i32,
        max_threshold: i32,
    ) -> Result<StockLevelReport, InventoryError> {
        products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        let quantity = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(product_id))
            .filter(stock_records::Column::StoreId.eq(self.settings.default_store_id.as_str()))
            .one(&self.db)
            .await?
            .map_or(0, |r| r.quantity);

        let report = StockService::classify(quantity, min_threshold, max_threshold)?;
        Ok(report)
    }

    /// Returns a product's total stock and per-store breakdown.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` when the product is absent.
    pub async fn get_product_stock(&self, product_id: Uuid) -> Result<ProductStock, InventoryError> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(InventoryError::ProductNotFound(product_id))?;

        let per_store = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await?;

        let total = per_store.iter().map(|r| i64::from(r.quantity)).sum();

        Ok(ProductStock {
            product,
            total,
            per_store,
        })
    }

    /// Lists every stock record at or below a threshold, joined with
    /// product metadata and the units missing. With no explicit
    /// threshold each record is held against its own configured
    /// `min_stock`; an explicit one applies uniformly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn low_stock_alerts(
        &self,
        threshold: Option<i32>,
    ) -> Result<Vec<LowStockAlert>, InventoryError> {
        let stock_repo = StockRepository::new(self.db.clone());
        let rows = stock_repo
            .list_low(threshold)
            .await
            .map_err(map_stock_error)?;

        Ok(rows
            .into_iter()
            .map(|stock| {
                let floor = threshold.unwrap_or(stock.record.min_stock);
                let deficit = StockService::deficit(stock.record.quantity, floor);
                LowStockAlert { stock, deficit }
            })
            .collect())
    }
}

/// Maps counter-level errors into coordination errors. Insufficiency is
/// handled where the context (store, quantities) is known; anything
/// reaching this point is either a driver failure or a bug.
fn map_stock_error(err: StockError) -> InventoryError {
    match err {
        StockError::Database(e) => InventoryError::Database(e),
        other => InventoryError::Internal(other.to_string()),
    }
}

/// Ledger appends issued here are built from already-validated input,
/// so only storage failures are expected back.
fn flatten_ledger_error(err: LedgerError) -> InventoryError {
    match err {
        LedgerError::Database(e) => InventoryError::Database(e),
        other => InventoryError::Internal(other.to_string()),
    }
}
