//! Catalog domain types.

use rust_decimal::Decimal;

/// Input for creating a product. All fields are required.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Stock-keeping unit: unique human-assigned product code.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Unit price.
    pub price: Decimal,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// New SKU; uniqueness is re-checked against all other products.
    pub sku: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category label.
    pub category: Option<String>,
    /// New unit price.
    pub price: Option<Decimal>,
}

impl ProductPatch {
    /// Returns true when the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::default().is_empty());

        let patch = ProductPatch {
            price: Some(dec!(9.99)),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
