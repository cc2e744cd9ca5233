//! In-memory cache with absolute per-entry expiration and a per-key
//! single-flight guard.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use courier_core::{CacheError, CourierResult};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::traits::{Cache, CachedValue, ValueFactory};

/// Expiration applied when a caller does not declare one.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(5 * 60);

struct CacheEntry {
    value: CachedValue,
    expires_at: Instant,
}

/// In-memory [`Cache`] implementation.
///
/// Expiration is absolute from insertion, not sliding; an expired entry is
/// treated as absent (and pruned) on the next read. The in-flight map holds
/// one async mutex per key currently being computed, so concurrent misses
/// on the same key share one factory run; waiters re-check the entry once
/// the computation finishes.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    default_expiration: Duration,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_expiration(DEFAULT_EXPIRATION)
    }

    /// Create a cache with a non-default fallback expiration.
    pub fn with_expiration(default_expiration: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            default_expiration,
        }
    }

    /// Whether an unexpired entry exists under `key`.
    pub fn contains(&self, key: &str) -> CourierResult<bool> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
        Ok(entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now()))
    }

    fn lookup(&self, key: &str) -> CourierResult<Option<CachedValue>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned)?;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Entry was expired when observed; prune it under the write lock,
        // re-checking in case a writer got there first.
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned)?;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    fn store(
        &self,
        key: &str,
        value: CachedValue,
        expiration: Option<Duration>,
    ) -> CourierResult<()> {
        let expires_at = Instant::now() + expiration.unwrap_or(self.default_expiration);
        self.entries
            .write()
            .map_err(|_| CacheError::LockPoisoned)?
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn flight_gate(&self, key: &str) -> Arc<Mutex<()>> {
        let mut gates = self.in_flight.lock().await;
        gates
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_gate(&self, key: &str, gate: Arc<Mutex<()>>) {
        drop(gate);
        let mut gates = self.in_flight.lock().await;
        if let Some(existing) = gates.get(key) {
            // Only the map holds the gate: no other caller is in flight.
            if Arc::strong_count(existing) == 1 {
                gates.remove(key);
            }
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_or_add<'a>(
        &self,
        key: &str,
        factory: ValueFactory<'a>,
        expiration: Option<Duration>,
    ) -> CourierResult<CachedValue> {
        if let Some(value) = self.lookup(key)? {
            return Ok(value);
        }

        let gate = self.flight_gate(key).await;
        let result = {
            let _guard = gate.lock().await;
            match self.lookup(key) {
                Err(err) => Err(err),
                // Another caller filled the entry while we waited.
                Ok(Some(value)) => Ok(value),
                Ok(None) => match factory().await {
                    Ok(value) => self.store(key, value.clone(), expiration).map(|()| value),
                    Err(err) => Err(err),
                },
            }
        };
        self.release_gate(key, gate).await;
        result
    }

    async fn remove(&self, key: &str) -> CourierResult<()> {
        self.entries
            .write()
            .map_err(|_| CacheError::LockPoisoned)?
            .remove(key);
        Ok(())
    }
}
