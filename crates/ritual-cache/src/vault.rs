//! Versioned bag persistence.

use ritual_bag::bag::{BagLine, RitualBag};
use ritual_bag::{BagError, Currency};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{cache_key, Cache, CacheError, SessionId};

/// Maximum retry attempts for [`BagVault::update`].
pub const MAX_UPDATE_RETRIES: u32 = 3;

const KEY_PREFIX: &str = "bag";

/// Bag record as stored in the cache.
///
/// The drawer flag is presentation state and is not stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedBag {
    /// Owning session.
    pub session: SessionId,
    /// Bag currency.
    pub currency: Currency,
    /// Lines in first-added order.
    pub lines: Vec<BagLine>,
    /// Bag version at save time; the optimistic concurrency stamp.
    pub version: u64,
    /// Unix timestamp of the save.
    pub saved_at: u64,
    /// Set when the bag was discarded. The record stays behind so the
    /// session's version keeps counting up instead of restarting at 0.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discarded: bool,
}

/// Persists one bag per session under `bag:<session>`.
///
/// Saves are compare-and-swap on the stored version: a caller passes the
/// version it loaded, and the save is rejected with
/// [`CacheError::ConcurrentModification`] if someone else saved in between.
/// Versions never repeat for a session: [`BagVault::discard`] leaves a
/// marker at the next version, and a bag started after it continues from
/// there, so a writer holding a pre-discard version is still rejected.
pub struct BagVault {
    cache: Cache,
}

impl BagVault {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Underlying cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Stored record, if any. Discarded bags have none.
    pub fn load_record(&self, session: &SessionId) -> Result<Option<PersistedBag>, CacheError> {
        Ok(self.stored(session)?.filter(|record| !record.discarded))
    }

    fn stored(&self, session: &SessionId) -> Result<Option<PersistedBag>, CacheError> {
        self.cache.get(&Self::key(session))
    }

    /// Restore the stored bag for a session. The drawer starts closed.
    pub fn load(&self, session: &SessionId) -> Result<Option<RitualBag>, CacheError> {
        let Some(record) = self.load_record(session)? else {
            return Ok(None);
        };
        let bag = RitualBag::restore(record.currency, record.lines, record.version)?;
        Ok(Some(bag))
    }

    /// Restore the stored bag, or start an empty one in `currency`.
    ///
    /// A stored bag keeps its own currency. After a discard the new bag
    /// starts at the discarded bag's final version.
    pub fn load_or_new(
        &self,
        session: &SessionId,
        currency: Currency,
    ) -> Result<RitualBag, CacheError> {
        match self.stored(session)? {
            Some(record) if record.discarded => {
                Ok(RitualBag::restore(currency, Vec::new(), record.version)?)
            }
            Some(record) => Ok(RitualBag::restore(
                record.currency,
                record.lines,
                record.version,
            )?),
            None => Ok(RitualBag::new(currency)),
        }
    }

    /// Save `bag` if the stored version still equals `base_version`.
    ///
    /// `base_version` is the bag's version when it was loaded (0 for a bag
    /// that was never stored). Returns the version now stored. A bag with no
    /// changes since `base_version` is not written.
    pub fn save(
        &self,
        session: &SessionId,
        bag: &RitualBag,
        base_version: u64,
    ) -> Result<u64, CacheError> {
        let key = Self::key(session);
        let raw = self.cache.get_raw(&key)?;
        let stored_version = Self::version_of(raw.as_deref())?;

        if stored_version != base_version {
            warn!(%session, expected = base_version, found = stored_version, "bag save conflict");
            return Err(CacheError::ConcurrentModification {
                key,
                expected: base_version,
                found: stored_version,
            });
        }

        if bag.version() <= base_version {
            debug!(%session, version = stored_version, "bag unchanged, skipping save");
            return Ok(stored_version);
        }

        let record = PersistedBag {
            session: session.clone(),
            currency: bag.currency(),
            lines: bag.lines().to_vec(),
            version: bag.version(),
            saved_at: current_timestamp(),
            discarded: false,
        };

        if !self.cache.set_if(&key, raw.as_deref(), &record)? {
            let found = Self::version_of(self.cache.get_raw(&key)?.as_deref())?;
            warn!(%session, expected = base_version, found, "bag changed during save");
            return Err(CacheError::ConcurrentModification {
                key,
                expected: base_version,
                found,
            });
        }

        debug!(%session, version = record.version, lines = record.lines.len(), "saved bag");
        Ok(record.version)
    }

    /// Load, apply `f`, and save, retrying on concurrent modification.
    ///
    /// `f` may run more than once, each time against a freshly loaded bag.
    /// Errors returned by `f` abort without saving.
    ///
    /// # Returns
    /// - `Ok((T, RitualBag))` - `f`'s result and the bag as saved
    /// - `Err(CacheError::ConcurrentModification)` - if all retries failed
    pub fn update<T, F>(
        &self,
        session: &SessionId,
        currency: Currency,
        f: F,
    ) -> Result<(T, RitualBag), CacheError>
    where
        F: Fn(&mut RitualBag) -> Result<T, BagError>,
    {
        let mut last_conflict = None;

        for attempt in 0..MAX_UPDATE_RETRIES {
            let mut bag = self.load_or_new(session, currency)?;
            let base_version = bag.version();
            let out = f(&mut bag)?;

            match self.save(session, &bag, base_version) {
                Ok(_) => return Ok((out, bag)),
                Err(e @ CacheError::ConcurrentModification { .. }) => {
                    debug!(%session, attempt, "retrying bag update");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_conflict.unwrap_or_else(|| CacheError::StoreError(
            "max retries exceeded".to_string(),
        )))
    }

    /// Drop the stored bag for a session.
    ///
    /// Replaces the record with an empty discarded marker one version past
    /// the stored bag. Discarding a missing or already discarded bag is a
    /// no-op.
    pub fn discard(&self, session: &SessionId) -> Result<(), CacheError> {
        let key = Self::key(session);

        for _ in 0..MAX_UPDATE_RETRIES {
            let raw = self.cache.get_raw(&key)?;
            let Some(bytes) = raw.as_deref() else {
                return Ok(());
            };
            let stored: PersistedBag = serde_json::from_slice(bytes)?;
            if stored.discarded {
                return Ok(());
            }

            let marker = PersistedBag {
                session: session.clone(),
                currency: stored.currency,
                lines: Vec::new(),
                version: stored.version + 1,
                saved_at: current_timestamp(),
                discarded: true,
            };
            if self.cache.set_if(&key, raw.as_deref(), &marker)? {
                info!(%session, version = marker.version, "discarded stored bag");
                return Ok(());
            }
            debug!(%session, "bag changed during discard, retrying");
        }

        let found = Self::version_of(self.cache.get_raw(&key)?.as_deref())?;
        Err(CacheError::ConcurrentModification {
            key,
            expected: found.saturating_sub(1),
            found,
        })
    }

    /// Sessions with a stored bag.
    pub fn sessions(&self) -> Result<Vec<SessionId>, CacheError> {
        let prefix = format!("{KEY_PREFIX}:");
        let mut sessions = Vec::new();
        for key in self.cache.keys_with_prefix(&prefix)? {
            let Some(session) = key.strip_prefix(&prefix).map(SessionId::from) else {
                continue;
            };
            if self.load_record(&session)?.is_some() {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    fn key(session: &SessionId) -> String {
        cache_key!(KEY_PREFIX, session)
    }

    fn version_of(raw: Option<&[u8]>) -> Result<u64, CacheError> {
        match raw {
            Some(bytes) => Ok(serde_json::from_slice::<PersistedBag>(bytes)?.version),
            None => Ok(0),
        }
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
