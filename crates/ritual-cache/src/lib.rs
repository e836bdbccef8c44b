//! Typed key-value storage for Ritual.
//!
//! Provides a small JSON-over-bytes cache with pluggable backends, and
//! [`BagVault`], which persists a [`RitualBag`](ritual_bag::bag::RitualBag)
//! per session with an optimistic version check.
//!
//! # Example
//!
//! ```rust
//! use ritual_bag::prelude::*;
//! use ritual_cache::{BagVault, Cache, SessionId};
//!
//! let vault = BagVault::new(Cache::in_memory());
//! let session = SessionId::new("sess_demo");
//!
//! let mut bag = vault.load_or_new(&session, Currency::USD).unwrap();
//! let base = bag.version();
//! bag.add_item("prod-1", None, "Rose Oil", Money::new(4200, Currency::USD), "img.jpg")
//!     .unwrap();
//! vault.save(&session, &bag, base).unwrap();
//!
//! let restored = vault.load(&session).unwrap().unwrap();
//! assert_eq!(restored.total_items(), 1);
//! assert!(!restored.is_open());
//! ```

mod backend;
mod error;
mod kv;
mod session;
mod vault;

pub use backend::{KvBackend, MemoryBackend};
#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileBackend;
#[cfg(target_arch = "wasm32")]
pub use backend::SpinBackend;
pub use error::CacheError;
pub use kv::Cache;
pub use session::SessionId;
pub use vault::{BagVault, PersistedBag, MAX_UPDATE_RETRIES};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{BagVault, Cache, CacheError, KvBackend, SessionId};
}
