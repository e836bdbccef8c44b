//! Static fixture catalog.
//!
//! Stands in for the product service until a real backend exists. Fixture
//! files are JSON with prices in minor units:
//!
//! ```json
//! {
//!   "currency": "USD",
//!   "products": [
//!     {"id": "prod-1", "name": "Rose Oil", "image": "img.jpg", "price_cents": 4200},
//!     {"id": "prod-2", "name": "Oud Elixir", "image": "oud.jpg", "price_cents": 6000,
//!      "variants": [{"name": "50ml"}, {"name": "100ml", "price_cents": 9500}]}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::{Catalog, CatalogEntry, CatalogVariant};
use crate::error::BagError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Deserialize;

#[derive(Deserialize)]
struct FixtureFile {
    #[serde(default)]
    currency: Currency,
    products: Vec<FixtureProduct>,
}

#[derive(Deserialize)]
struct FixtureProduct {
    id: String,
    name: String,
    #[serde(default)]
    image: String,
    price_cents: i64,
    #[serde(default)]
    variants: Vec<FixtureVariant>,
}

#[derive(Deserialize)]
struct FixtureVariant {
    name: String,
    #[serde(default)]
    price_cents: Option<i64>,
}

/// In-memory catalog built from fixture data.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    entries: BTreeMap<ProductId, CatalogEntry>,
}

impl FixtureCatalog {
    /// Build a catalog from entries. Later duplicates replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.product_id.clone(), entry))
                .collect(),
        }
    }

    /// Parse a fixture document.
    pub fn from_json(json: &str) -> Result<Self, BagError> {
        let file: FixtureFile = serde_json::from_str(json)?;
        let currency = file.currency;

        let entries = file.products.into_iter().map(|p| {
            let variants = p
                .variants
                .into_iter()
                .map(|v| CatalogVariant {
                    name: v.name,
                    unit_price: v.price_cents.map(|cents| Money::new(cents, currency)),
                })
                .collect();
            CatalogEntry {
                product_id: ProductId::new(p.id),
                display_name: p.name,
                image_url: p.image,
                unit_price: Money::new(p.price_cents, currency),
                variants,
            }
        });

        Ok(Self::from_entries(entries))
    }

    /// Load a fixture file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BagError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| BagError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in product id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl Catalog for FixtureCatalog {
    fn lookup(&self, product_id: &ProductId) -> Option<CatalogEntry> {
        self.entries.get(product_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "currency": "USD",
        "products": [
            {"id": "prod-1", "name": "Rose Oil", "image": "img.jpg", "price_cents": 4200},
            {"id": "prod-2", "name": "Oud Elixir", "image": "oud.jpg", "price_cents": 6000,
             "variants": [{"name": "50ml"}, {"name": "100ml", "price_cents": 9500}]}
        ]
    }"#;

    #[test]
    fn test_parse_fixture() {
        let catalog = FixtureCatalog::from_json(FIXTURE).unwrap();
        assert_eq!(catalog.len(), 2);

        let rose = catalog.lookup(&ProductId::new("prod-1")).unwrap();
        assert_eq!(rose.display_name, "Rose Oil");
        assert_eq!(rose.unit_price, Money::new(4200, Currency::USD));
        assert!(!rose.has_variants());

        let oud = catalog.lookup(&ProductId::new("prod-2")).unwrap();
        assert_eq!(oud.variants.len(), 2);
        assert_eq!(
            oud.price_for(Some("100ml")).unwrap(),
            Money::new(9500, Currency::USD)
        );
    }

    #[test]
    fn test_missing_product() {
        let catalog = FixtureCatalog::from_json(FIXTURE).unwrap();
        assert!(catalog.lookup(&ProductId::new("prod-404")).is_none());
    }

    #[test]
    fn test_malformed_fixture() {
        assert!(matches!(
            FixtureCatalog::from_json(r#"{"products": [{"id": "x"}]}"#),
            Err(BagError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            FixtureCatalog::load("/definitely/not/here.json"),
            Err(BagError::Catalog(_))
        ));
    }
}
