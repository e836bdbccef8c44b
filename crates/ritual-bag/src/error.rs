//! Bag error types.

use thiserror::Error;

/// Errors reported synchronously by bag operations.
///
/// Every error leaves the bag exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BagError {
    /// Product id was empty or whitespace.
    #[error("Product id must not be empty")]
    EmptyProductId,

    /// Unit price below zero.
    #[error("Negative unit price for {product_id}: {amount_cents}")]
    NegativePrice {
        product_id: String,
        amount_cents: i64,
    },

    /// Price currency differs from the bag currency.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Quantity exceeds maximum allowed per line.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Decimal amount that has no minor-unit value (NaN, infinite, out of range).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Catalog has no such product.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog product has no such variant.
    #[error("Variant {variant:?} not found for product {product_id}")]
    VariantNotFound {
        product_id: String,
        variant: Option<String>,
    },

    /// Restored lines break a bag invariant.
    #[error("Invalid bag state: {0}")]
    InvalidState(String),

    /// Catalog fixture could not be read.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BagError {
    fn from(e: serde_json::Error) -> Self {
        BagError::Serialization(e.to_string())
    }
}
