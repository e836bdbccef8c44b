//! The bag store.

use crate::bag::{BagLine, BagTotals, CheckoutSnapshot, ItemKey};
use crate::catalog::Catalog;
use crate::error::BagError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use tracing::{debug, info, warn};

/// Maximum quantity allowed per line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// The customer's bag for one session.
///
/// Owned by the application shell and handed to consumers by reference.
/// Lines keep first-added order, each [`ItemKey`] appears at most once, and
/// every line has a quantity of at least 1. Totals are recomputed from the
/// lines on every read.
///
/// `version` increases by one on every change to the lines (drawer toggles
/// don't count). Persistence layers use it as an optimistic concurrency stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RitualBag {
    currency: Currency,
    lines: Vec<BagLine>,
    is_open: bool,
    version: u64,
}

impl RitualBag {
    /// Create an empty, closed bag.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            lines: Vec::new(),
            is_open: false,
            version: 0,
        }
    }

    /// Rebuild a bag from previously captured lines.
    ///
    /// The restored bag starts with its drawer closed. Fails if the lines
    /// break a bag invariant.
    pub fn restore(
        currency: Currency,
        lines: Vec<BagLine>,
        version: u64,
    ) -> Result<Self, BagError> {
        for (idx, line) in lines.iter().enumerate() {
            if line.key.product_id.is_blank() {
                return Err(BagError::InvalidState(format!("line {idx} has an empty product id")));
            }
            if !(1..=MAX_QUANTITY_PER_LINE).contains(&line.quantity) {
                return Err(BagError::InvalidState(format!(
                    "line {} has quantity {}",
                    line.key, line.quantity
                )));
            }
            if line.unit_price.is_negative() {
                return Err(BagError::NegativePrice {
                    product_id: line.key.product_id.to_string(),
                    amount_cents: line.unit_price.amount_cents,
                });
            }
            if line.unit_price.currency != currency {
                return Err(BagError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: line.unit_price.currency.code().to_string(),
                });
            }
            if lines[..idx].iter().any(|other| other.key == line.key) {
                return Err(BagError::InvalidState(format!("duplicate line {}", line.key)));
            }
        }

        info!(lines = lines.len(), version, "restored bag");
        Ok(Self {
            currency,
            lines,
            is_open: false,
            version,
        })
    }

    /// Add one unit of a product (variant) to the bag and open the drawer.
    ///
    /// If a line with the same key exists its quantity grows by one and its
    /// captured name, image and price stay as they were. Otherwise a new line
    /// with quantity 1 is appended.
    ///
    /// Returns an error, leaving the bag untouched, if:
    /// - the product id is blank
    /// - the unit price is negative or in another currency
    /// - the line would exceed [`MAX_QUANTITY_PER_LINE`]
    pub fn add_item(
        &mut self,
        product_id: impl Into<ProductId>,
        variant: Option<&str>,
        display_name: impl Into<String>,
        unit_price: Money,
        image_url: impl Into<String>,
    ) -> Result<&BagLine, BagError> {
        let key = ItemKey::new(product_id, variant);
        if let Err(e) = self.validate_add(&key, &unit_price) {
            warn!(key = %key, error = %e, "rejected bag add");
            return Err(e);
        }

        let idx = match self.position(&key) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity += 1;
                debug!(key = %line.key, quantity = line.quantity, "merged into existing bag line");
                idx
            }
            None => {
                debug!(key = %key, unit_price = %unit_price, "appended bag line");
                self.lines.push(BagLine::new(
                    key,
                    display_name.into(),
                    image_url.into(),
                    unit_price,
                ));
                self.lines.len() - 1
            }
        };

        self.version += 1;
        self.is_open = true;
        Ok(&self.lines[idx])
    }

    /// Add a product using the names and prices the catalog supplies.
    ///
    /// Products that declare variants require one of them; products without
    /// variants reject any variant label.
    pub fn add_from_catalog<C: Catalog + ?Sized>(
        &mut self,
        catalog: &C,
        product_id: &ProductId,
        variant: Option<&str>,
    ) -> Result<&BagLine, BagError> {
        let entry = catalog
            .lookup(product_id)
            .ok_or_else(|| BagError::ProductNotFound(product_id.to_string()))?;
        let unit_price = entry.price_for(variant)?;
        self.add_item(
            entry.product_id,
            variant,
            entry.display_name,
            unit_price,
            entry.image_url,
        )
    }

    /// Remove the line with this key.
    ///
    /// Returns `false` when no such line exists; that is not an error.
    pub fn remove_item(&mut self, key: &ItemKey) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|line| &line.key != key);
        let removed = self.lines.len() < len_before;
        if removed {
            self.version += 1;
            debug!(key = %key, "removed bag line");
        }
        removed
    }

    /// Set the quantity of a line to exactly `quantity`.
    ///
    /// A quantity of zero or below removes the line. Returns whether a line
    /// with this key was found.
    pub fn update_quantity(&mut self, key: &ItemKey, quantity: i64) -> Result<bool, BagError> {
        if quantity <= 0 {
            return Ok(self.remove_item(key));
        }

        if quantity > MAX_QUANTITY_PER_LINE {
            warn!(key = %key, quantity, "rejected bag quantity");
            return Err(BagError::QuantityExceedsLimit(quantity, MAX_QUANTITY_PER_LINE));
        }

        let Some(line) = self.lines.iter_mut().find(|line| &line.key == key) else {
            return Ok(false);
        };
        if line.quantity != quantity {
            line.quantity = quantity;
            self.version += 1;
            debug!(key = %key, quantity, "updated bag line quantity");
        }
        Ok(true)
    }

    /// Remove every line. The drawer stays as it was.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        info!(lines = self.lines.len(), "cleared bag");
        self.lines.clear();
        self.version += 1;
    }

    /// Show the bag drawer.
    pub fn open_drawer(&mut self) {
        self.is_open = true;
    }

    /// Hide the bag drawer.
    pub fn close_drawer(&mut self) {
        self.is_open = false;
    }

    /// Whether the drawer is visible.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Lines in first-added order.
    pub fn lines(&self) -> &[BagLine] {
        &self.lines
    }

    /// Get a line by key.
    pub fn get(&self, key: &ItemKey) -> Option<&BagLine> {
        self.lines.iter().find(|line| &line.key == key)
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Bag currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Change stamp of the lines.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of quantity * unit price over all lines.
    pub fn total_price(&self) -> Result<Money, BagError> {
        let line_totals = self
            .lines
            .iter()
            .map(BagLine::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::checked_sum(&line_totals, self.currency).ok_or(BagError::Overflow)
    }

    /// Both derived totals at once.
    pub fn totals(&self) -> Result<BagTotals, BagError> {
        Ok(BagTotals {
            total_items: self.total_items(),
            total_price: self.total_price()?,
            line_count: self.line_count(),
        })
    }

    /// Copy of the current lines and totals for the checkout collaborator.
    pub fn checkout_snapshot(&self) -> Result<CheckoutSnapshot, BagError> {
        Ok(CheckoutSnapshot {
            currency: self.currency,
            lines: self.lines.clone(),
            totals: self.totals()?,
            version: self.version,
        })
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.lines.iter().position(|line| &line.key == key)
    }

    fn validate_add(&self, key: &ItemKey, unit_price: &Money) -> Result<(), BagError> {
        if key.product_id.is_blank() {
            return Err(BagError::EmptyProductId);
        }
        if unit_price.is_negative() {
            return Err(BagError::NegativePrice {
                product_id: key.product_id.to_string(),
                amount_cents: unit_price.amount_cents,
            });
        }
        if unit_price.currency != self.currency {
            return Err(BagError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: unit_price.currency.code().to_string(),
            });
        }
        if let Some(line) = self.get(key) {
            let next = line.quantity.checked_add(1).ok_or(BagError::Overflow)?;
            if next > MAX_QUANTITY_PER_LINE {
                return Err(BagError::QuantityExceedsLimit(next, MAX_QUANTITY_PER_LINE));
            }
        }
        Ok(())
    }
}

impl Default for RitualBag {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
