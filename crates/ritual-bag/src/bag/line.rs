//! Bag line items.

use crate::bag::ItemKey;
use crate::error::BagError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One purchasable line in the bag.
///
/// Name, image and price are captured when the line is first added and are
/// never re-synced with the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BagLine {
    /// Line identity.
    #[serde(flatten)]
    pub key: ItemKey,
    /// Product name (denormalized for display).
    pub display_name: String,
    /// Product image (denormalized for display).
    pub image_url: String,
    /// Unit price at add time.
    pub unit_price: Money,
    /// Quantity, always at least 1.
    pub quantity: i64,
}

impl BagLine {
    pub(crate) fn new(
        key: ItemKey,
        display_name: String,
        image_url: String,
        unit_price: Money,
    ) -> Self {
        Self {
            key,
            display_name,
            image_url,
            unit_price,
            quantity: 1,
        }
    }

    /// Product this line refers to.
    pub fn product_id(&self) -> &ProductId {
        &self.key.product_id
    }

    /// Variant label, if any.
    pub fn variant(&self) -> Option<&str> {
        self.key.variant_str()
    }

    /// Line total (unit_price * quantity).
    pub fn line_total(&self) -> Result<Money, BagError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or(BagError::Overflow)
    }
}
