//! Ritual Bag: the storefront's shopping cart store.
//!
//! This crate holds the in-memory bag a customer fills while browsing:
//!
//! - **Bag**: line items keyed by product + variant, drawer visibility, derived totals
//! - **Actions**: a serializable reducer surface over the same operations
//! - **Catalog**: the lookup seam that supplies names and prices at add time
//! - **Checkout**: an immutable snapshot handed to the checkout collaborator
//!
//! # Example
//!
//! ```rust
//! use ritual_bag::prelude::*;
//!
//! let mut bag = RitualBag::new(Currency::USD);
//! bag.add_item(
//!     "prod-1",
//!     None,
//!     "Rose Oil",
//!     Money::new(4200, Currency::USD),
//!     "img.jpg",
//! )
//! .unwrap();
//!
//! assert!(bag.is_open());
//! assert_eq!(bag.total_items(), 1);
//! assert_eq!(bag.total_price().unwrap().display(), "$42.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod bag;
pub mod catalog;

pub use error::BagError;
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::BagError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Bag
    pub use crate::bag::{
        BagAction, BagLine, BagTotals, CheckoutSnapshot, ItemKey, RitualBag,
        MAX_QUANTITY_PER_LINE,
    };

    // Catalog
    pub use crate::catalog::{Catalog, CatalogEntry, CatalogVariant, FixtureCatalog};
}
