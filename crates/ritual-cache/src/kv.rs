//! Typed cache over a byte backend.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::backend::FileBackend;
use crate::backend::{KvBackend, MemoryBackend};
use crate::CacheError;

/// Type-safe cache with automatic JSON serialization.
pub struct Cache {
    backend: Box<dyn KvBackend>,
}

impl Cache {
    /// Wrap any backend.
    pub fn with_backend(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Process-local cache.
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::new())
    }

    /// Cache stored as files under `dir`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::file(".ritual/store")?;
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn file(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::with_backend(FileBackend::open(dir)?))
    }

    /// Open the default Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::with_backend(crate::backend::SpinBackend::open_default()?))
    }

    /// Open a named Spin Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        Ok(Self::with_backend(crate::backend::SpinBackend::open(name)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.backend.keys()
    }

    /// Get keys that start with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut keys = self.keys()?;
        keys.retain(|k| k.starts_with(prefix));
        Ok(keys)
    }

    /// Raw bytes for a key, for compare-and-swap callers.
    pub(crate) fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key)
    }

    /// Serialize `value` and write it only if the stored bytes still equal
    /// `expected`.
    pub(crate) fn set_if<T: Serialize>(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &T,
    ) -> Result<bool, CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.swap_if(key, expected, &bytes)
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let session = "sess_abc";
/// let key = ritual_cache::cache_key!("bag", session);
/// assert_eq!(key, "bag:sess_abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Preference {
        currency: String,
        drawer_hint_seen: bool,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::in_memory();
        let pref = Preference {
            currency: "EUR".to_string(),
            drawer_hint_seen: true,
        };
        cache.set("pref:sess_1", &pref).unwrap();
        assert_eq!(cache.get::<Preference>("pref:sess_1").unwrap(), Some(pref));
        assert_eq!(cache.get::<Preference>("pref:sess_2").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_serialize_error() {
        let cache = Cache::in_memory();
        cache.set("pref:sess_1", &42).unwrap();
        assert!(matches!(
            cache.get::<Preference>("pref:sess_1"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_keys_with_prefix() {
        let cache = Cache::in_memory();
        cache.set("bag:a", &1).unwrap();
        cache.set("bag:b", &2).unwrap();
        cache.set("pref:a", &3).unwrap();
        assert_eq!(cache.keys_with_prefix("bag:").unwrap(), vec!["bag:a", "bag:b"]);
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("bag", "sess_1"), "bag:sess_1");
        assert_eq!(cache_key!("bag", "sess_1", 3), "bag:sess_1:3");
    }
}
