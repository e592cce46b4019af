//! Initial schema: products, stock records and the movement ledger.
//!
//! Uniqueness and non-negativity live in the schema as the storage-side
//! last line of defense; application code enforces the same rules with
//! typed errors before the database ever sees a bad write.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS movements CASCADE;
             DROP TABLE IF EXISTS stock_records CASCADE;
             DROP TABLE IF EXISTS products CASCADE;
             DROP TYPE IF EXISTS movement_type;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Movement kinds form a closed set
CREATE TYPE movement_type AS ENUM ('in', 'out', 'transfer');

-- Product catalog; SKU is the human-assigned unique code
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sku VARCHAR(64) NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    category VARCHAR(100) NOT NULL,
    price NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_products_sku UNIQUE (sku),
    CONSTRAINT chk_products_price_non_negative CHECK (price >= 0)
);

-- Per-(product, store) stock counters; stores are labels, not entities
CREATE TABLE stock_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    store_id VARCHAR(100) NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0,
    min_stock INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_stock_records_product_store UNIQUE (product_id, store_id),
    CONSTRAINT chk_stock_records_quantity_non_negative CHECK (quantity >= 0),
    CONSTRAINT chk_stock_records_min_stock_non_negative CHECK (min_stock >= 0)
);

-- Store-scoped listings
CREATE INDEX idx_stock_records_store ON stock_records(store_id);

-- Low-stock alert scans
CREATE INDEX idx_stock_records_low ON stock_records(product_id) WHERE quantity <= min_stock;

-- Append-only movement ledger
CREATE TABLE movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id),
    movement_type movement_type NOT NULL,
    quantity INTEGER NOT NULL,
    source_store_id VARCHAR(100),
    target_store_id VARCHAR(100),
    reference VARCHAR(255),
    notes TEXT,
    unit_price NUMERIC(12, 2),
    moved_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_movements_quantity_positive CHECK (quantity > 0)
);

-- The three query projections: by product, by type, by time range
CREATE INDEX idx_movements_product ON movements(product_id, moved_at DESC);
CREATE INDEX idx_movements_type ON movements(movement_type, moved_at DESC);
CREATE INDEX idx_movements_moved_at ON movements(moved_at DESC);
";
