//! Derived totals and checkout snapshots.

use crate::bag::BagLine;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Totals derived from the bag lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BagTotals {
    /// Sum of quantities (the drawer badge count).
    pub total_items: i64,
    /// Sum of quantity * unit price.
    pub total_price: Money,
    /// Number of distinct lines.
    pub line_count: usize,
}

impl BagTotals {
    /// Whether the totals describe an empty bag.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Point-in-time copy of the bag handed to checkout.
///
/// Later changes to the bag do not affect an existing snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSnapshot {
    /// Bag currency.
    pub currency: Currency,
    /// Lines in first-added order.
    pub lines: Vec<BagLine>,
    /// Totals at snapshot time.
    pub totals: BagTotals,
    /// Bag version the snapshot was taken at.
    pub version: u64,
}
