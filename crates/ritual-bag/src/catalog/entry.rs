//! Catalog entries and the lookup trait.

use crate::error::BagError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Source of product data for the bag.
pub trait Catalog {
    /// Look up a product by id.
    fn lookup(&self, product_id: &ProductId) -> Option<CatalogEntry>;
}

/// Product data as the catalog presents it at add time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Product identifier.
    pub product_id: ProductId,
    /// Name shown in the bag.
    pub display_name: String,
    /// Image shown in the bag.
    pub image_url: String,
    /// Base unit price.
    pub unit_price: Money,
    /// Purchasable variants; empty for single-variant products.
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

impl CatalogEntry {
    /// Create an entry without variants.
    pub fn new(
        product_id: impl Into<ProductId>,
        display_name: impl Into<String>,
        image_url: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            display_name: display_name.into(),
            image_url: image_url.into(),
            unit_price,
            variants: Vec::new(),
        }
    }

    /// Add a variant.
    pub fn with_variant(mut self, variant: CatalogVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Check if this product is sold in variants.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Find a variant by label.
    pub fn variant(&self, name: &str) -> Option<&CatalogVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Resolve the unit price for an optional variant label.
    ///
    /// Products with variants require a known label; products without
    /// variants accept only `None` (or an empty label).
    pub fn price_for(&self, variant: Option<&str>) -> Result<Money, BagError> {
        let variant = variant.filter(|v| !v.is_empty());
        match (variant, self.has_variants()) {
            (None, false) => Ok(self.unit_price),
            (Some(name), true) => self
                .variant(name)
                .map(|v| v.unit_price.unwrap_or(self.unit_price))
                .ok_or_else(|| self.variant_not_found(Some(name))),
            (variant, _) => Err(self.variant_not_found(variant)),
        }
    }

    fn variant_not_found(&self, variant: Option<&str>) -> BagError {
        BagError::VariantNotFound {
            product_id: self.product_id.to_string(),
            variant: variant.map(str::to_string),
        }
    }
}

/// A purchasable variant such as a size or shade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogVariant {
    /// Variant label, used as the bag line's variant.
    pub name: String,
    /// Price override; falls back to the product price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
}

impl CatalogVariant {
    /// Variant at the product's base price.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_price: None,
        }
    }

    /// Variant with its own price.
    pub fn priced(name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            name: name.into(),
            unit_price: Some(unit_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn oud() -> CatalogEntry {
        CatalogEntry::new("prod-2", "Oud Elixir", "oud.jpg", Money::new(6000, Currency::USD))
            .with_variant(CatalogVariant::new("50ml"))
            .with_variant(CatalogVariant::priced("100ml", Money::new(9500, Currency::USD)))
    }

    #[test]
    fn test_variant_price_resolution() {
        let entry = oud();
        assert_eq!(entry.price_for(Some("50ml")).unwrap().amount_cents, 6000);
        assert_eq!(entry.price_for(Some("100ml")).unwrap().amount_cents, 9500);
    }

    #[test]
    fn test_variant_required_when_declared() {
        let entry = oud();
        assert!(matches!(
            entry.price_for(None),
            Err(BagError::VariantNotFound { variant: None, .. })
        ));
        assert!(entry.price_for(Some("5ml")).is_err());
    }

    #[test]
    fn test_simple_product_rejects_variant() {
        let entry = CatalogEntry::new("prod-1", "Rose Oil", "img.jpg", Money::new(4200, Currency::USD));
        assert_eq!(entry.price_for(None).unwrap().amount_cents, 4200);
        assert_eq!(entry.price_for(Some("")).unwrap().amount_cents, 4200);
        assert!(entry.price_for(Some("50ml")).is_err());
    }
}
