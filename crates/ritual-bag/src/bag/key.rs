//! Line identity.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a bag line: the product plus an optional variant label.
///
/// An empty variant label is the same as no variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawItemKey")]
pub struct ItemKey {
    /// Catalog product.
    pub product_id: ProductId,
    /// Free-text variant such as a size or shade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl ItemKey {
    /// Build a key, folding an empty variant into `None`.
    pub fn new(product_id: impl Into<ProductId>, variant: Option<&str>) -> Self {
        Self {
            product_id: product_id.into(),
            variant: variant.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    /// Key for a product without variants.
    pub fn product(product_id: impl Into<ProductId>) -> Self {
        Self::new(product_id, None)
    }

    /// Key for a specific variant of a product.
    pub fn variant(product_id: impl Into<ProductId>, variant: &str) -> Self {
        Self::new(product_id, Some(variant))
    }

    /// Variant label as a string slice.
    pub fn variant_str(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

/// Wire form of [`ItemKey`]; decoding goes through [`ItemKey::new`].
#[derive(Deserialize)]
struct RawItemKey {
    product_id: ProductId,
    #[serde(default)]
    variant: Option<String>,
}

impl From<RawItemKey> for ItemKey {
    fn from(raw: RawItemKey) -> Self {
        Self::new(raw.product_id, raw.variant.as_deref())
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{} [{}]", self.product_id, variant),
            None => write!(f, "{}", self.product_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_variant_is_no_variant() {
        assert_eq!(ItemKey::new("prod-1", Some("")), ItemKey::product("prod-1"));
    }

    #[test]
    fn test_variants_are_distinct() {
        assert_ne!(
            ItemKey::variant("prod-2", "50ml"),
            ItemKey::variant("prod-2", "100ml")
        );
        assert_ne!(ItemKey::variant("prod-2", "50ml"), ItemKey::product("prod-2"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemKey::product("prod-1").to_string(), "prod-1");
        assert_eq!(ItemKey::variant("prod-2", "50ml").to_string(), "prod-2 [50ml]");
    }

    #[test]
    fn test_variant_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&ItemKey::product("prod-1")).unwrap();
        assert_eq!(json, r#"{"product_id":"prod-1"}"#);

        let key: ItemKey = serde_json::from_str(r#"{"product_id":"prod-2","variant":"50ml"}"#).unwrap();
        assert_eq!(key, ItemKey::variant("prod-2", "50ml"));
    }

    #[test]
    fn test_empty_variant_in_json_is_no_variant() {
        let key: ItemKey = serde_json::from_str(r#"{"product_id":"prod-1","variant":""}"#).unwrap();
        assert_eq!(key, ItemKey::product("prod-1"));
        assert_eq!(key.variant, None);
    }
}
