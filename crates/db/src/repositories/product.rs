//! Product repository for catalog database operations.
//!
//! Owns the storage-touching catalog rules: SKU uniqueness probes on
//! create and on SKU-changing updates, and the referential guard that
//! refuses to delete a product any stock record still references.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Condition, Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use stockroom_core::catalog::{NewProduct, ProductPatch};

use crate::entities::{products, stock_records};

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Another product already carries this SKU.
    #[error("SKU '{0}' already exists")]
    DuplicateSku(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Product still has stock records and cannot be deleted.
    #[error("Cannot delete product {0} that exists in inventory")]
    HasInventory(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of a product update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// At least one field changed; the stored record is returned.
    Updated(products::Model),
    /// No field actually changed.
    Unchanged,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new product after probing SKU uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSku` when any existing product carries the same
    /// SKU.
    pub async fn create_product(&self, input: NewProduct) -> Result<products::Model, ProductError> {
        let existing = products::Entity::find()
            .filter(products::Column::Sku.eq(&input.sku))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(ProductError::DuplicateSku(input.sku));
        }

        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(input.sku),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            price: Set(input.price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let product = product.insert(&self.db).await?;
        Ok(product)
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_product_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<products::Model>, ProductError> {
        let product = products::Entity::find_by_id(id).one(&self.db).await?;
        Ok(product)
    }

    /// Applies a partial update. A SKU change re-probes uniqueness
    /// against all *other* products. A patch that changes nothing is
    /// reported as `Unchanged` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the product is absent, `DuplicateSku` on
    /// a conflicting SKU change.
    pub async fn update_product(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<UpdateOutcome, ProductError> {
        let product = products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if let Some(sku) = &patch.sku {
            if *sku != product.sku {
                let conflict = products::Entity::find()
                    .filter(products::Column::Sku.eq(sku))
                    .filter(products::Column::Id.ne(id))
                    .one(&self.db)
                    .await?;

                if conflict.is_some() {
                    return Err(ProductError::DuplicateSku(sku.clone()));
                }
            }
        }

        let mut changed = false;
        let mut active: products::ActiveModel = product.clone().into();

        if let Some(sku) = patch.sku {
            if sku != product.sku {
                active.sku = Set(sku);
                changed = true;
            }
        }
        if let Some(name) = patch.name {
            if name != product.name {
                active.name = Set(name);
                changed = true;
            }
        }
        if let Some(description) = patch.description {
            if description != product.description {
                active.description = Set(description);
                changed = true;
            }
        }
        if let Some(category) = patch.category {
            if category != product.category {
                active.category = Set(category);
                changed = true;
            }
        }
        if let Some(price) = patch.price {
            if price != product.price {
                active.price = Set(price);
                changed = true;
            }
        }

        if !changed {
            return Ok(UpdateOutcome::Unchanged);
        }

        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await?;
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Deletes a product, provided no stock record references it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when absent, `HasInventory` when stock records
    /// still reference the product.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ProductError> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let referencing = stock_records::Entity::find()
            .filter(stock_records::Column::ProductId.eq(id))
            .count(&self.db)
            .await?;

        if referencing > 0 {
            return Err(ProductError::HasInventory(id));
        }

        products::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Lists products with skip/limit pagination, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<products::Model>, ProductError> {
        let products = products::Entity::find()
            .order_by_asc(products::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(products)
    }

    /// Case-insensitive substring search over name, description and SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search_products(&self, query: &str) -> Result<Vec<products::Model>, ProductError> {
        let pattern = format!("%{}%", escape_like(query));

        let products = products::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::col((products::Entity, products::Column::Name)).ilike(pattern.as_str()))
                    .add(
                        Expr::col((products::Entity, products::Column::Description))
                            .ilike(pattern.as_str()),
                    )
                    .add(Expr::col((products::Entity, products::Column::Sku)).ilike(pattern.as_str())),
            )
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;

        Ok(products)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_like_passthrough() {
        assert_eq!(escape_like("steel bolt"), "steel bolt");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("STL_001"), "STL\\_001");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every wildcard in the input ends up escaped: the escaped
        /// string contains no `%` or `_` without a preceding backslash.
        #[test]
        fn prop_no_unescaped_wildcards(input in ".{0,40}") {
            let escaped = escape_like(&input);
            let chars: Vec<char> = escaped.chars().collect();
            let mut i = 0;
            while i < chars.len() {
                if chars[i] == '\\' {
                    // Escape sequence: skip the escaped character.
                    i += 2;
                    continue;
                }
                prop_assert!(chars[i] != '%' && chars[i] != '_');
                i += 1;
            }
        }

        /// Escaping never loses characters: stripping the escapes
        /// returns the original input.
        #[test]
        fn prop_escape_reversible(input in ".{0,40}") {
            let escaped = escape_like(&input);
            let mut restored = String::new();
            let mut chars = escaped.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        restored.push(next);
                    }
                } else {
                    restored.push(c);
                }
            }
            prop_assert_eq!(restored, input);
        }
    }
}
