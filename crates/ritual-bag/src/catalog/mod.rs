//! Catalog lookup seam.
//!
//! The bag does not own product data. A [`Catalog`] supplies the name, image
//! and price captured into a line at add time.

mod entry;
mod fixture;

pub use entry::{Catalog, CatalogEntry, CatalogVariant};
pub use fixture::FixtureCatalog;
