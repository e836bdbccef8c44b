//! Ritual bag module.
//!
//! Contains the store, its line items, the reducer actions, and derived totals.

mod action;
mod key;
mod line;
mod store;
mod totals;

pub use action::BagAction;
pub use key::ItemKey;
pub use line::BagLine;
pub use store::{RitualBag, MAX_QUANTITY_PER_LINE};
pub use totals::{BagTotals, CheckoutSnapshot};
