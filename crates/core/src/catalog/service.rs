//! Catalog field validation service.

use rust_decimal::Decimal;

use super::error::CatalogError;
use super::types::{NewProduct, ProductPatch};

/// Catalog field validation service.
pub struct CatalogService;

impl CatalogService {
    /// Validates a new product: every text field non-blank and a
    /// non-negative price. Field presence is the boundary's concern;
    /// SKU uniqueness is the repository's.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` naming the first invalid field.
    pub fn validate_new(product: &NewProduct) -> Result<(), CatalogError> {
        Self::require_non_blank("sku", &product.sku)?;
        Self::require_non_blank("name", &product.name)?;
        Self::require_non_blank("description", &product.description)?;
        Self::require_non_blank("category", &product.category)?;
        Self::validate_price(product.price)
    }

    /// Validates the fields present on a partial update.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` naming the first invalid field.
    pub fn validate_patch(patch: &ProductPatch) -> Result<(), CatalogError> {
        if let Some(sku) = &patch.sku {
            Self::require_non_blank("sku", sku)?;
        }
        if let Some(name) = &patch.name {
            Self::require_non_blank("name", name)?;
        }
        if let Some(description) = &patch.description {
            Self::require_non_blank("description", description)?;
        }
        if let Some(category) = &patch.category {
            Self::require_non_blank("category", category)?;
        }
        if let Some(price) = patch.price {
            Self::validate_price(price)?;
        }
        Ok(())
    }

    fn require_non_blank(field: &'static str, value: &str) -> Result<(), CatalogError> {
        if value.trim().is_empty() {
            return Err(CatalogError::EmptyField(field));
        }
        Ok(())
    }

    fn validate_price(price: Decimal) -> Result<(), CatalogError> {
        if price < Decimal::ZERO {
            return Err(CatalogError::NegativePrice(price));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn steel_bolt() -> NewProduct {
        NewProduct {
            sku: "STL001".to_string(),
            name: "Steel Bolt M8".to_string(),
            description: "Hex head steel bolt, 8mm".to_string(),
            category: "fasteners".to_string(),
            price: dec!(29.99),
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(CatalogService::validate_new(&steel_bolt()).is_ok());
    }

    #[test]
    fn test_blank_sku_rejected() {
        let mut product = steel_bolt();
        product.sku = "   ".to_string();
        assert!(matches!(
            CatalogService::validate_new(&product),
            Err(CatalogError::EmptyField("sku"))
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut product = steel_bolt();
        product.name = String::new();
        assert!(matches!(
            CatalogService::validate_new(&product),
            Err(CatalogError::EmptyField("name"))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut product = steel_bolt();
        product.price = dec!(-0.01);
        assert!(matches!(
            CatalogService::validate_new(&product),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_zero_price_allowed() {
        let mut product = steel_bolt();
        product.price = Decimal::ZERO;
        assert!(CatalogService::validate_new(&product).is_ok());
    }

    #[test]
    fn test_empty_patch_is_valid() {
        // An empty patch is a valid request; the repository reports it
        // as "no changes" rather than an error.
        assert!(CatalogService::validate_patch(&ProductPatch::default()).is_ok());
    }

    #[test]
    fn test_patch_blank_field_rejected() {
        let patch = ProductPatch {
            category: Some("  ".to_string()),
            ..ProductPatch::default()
        };
        assert!(matches!(
            CatalogService::validate_patch(&patch),
            Err(CatalogError::EmptyField("category"))
        ));
    }

    #[test]
    fn test_patch_negative_price_rejected() {
        let patch = ProductPatch {
            price: Some(dec!(-5)),
            ..ProductPatch::default()
        };
        assert!(matches!(
            CatalogService::validate_patch(&patch),
            Err(CatalogError::NegativePrice(_))
        ));
    }
}
