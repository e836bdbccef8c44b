//! Cache error types.

use ritual_bag::BagError;
use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Filesystem error in the file backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored record changed since it was read.
    #[error("Concurrent modification of {key}: expected version {expected}, found {found}")]
    ConcurrentModification {
        key: String,
        expected: u64,
        found: u64,
    },

    /// Stored bag could not be rebuilt.
    #[error("Invalid stored bag: {0}")]
    Bag(#[from] BagError),
}
