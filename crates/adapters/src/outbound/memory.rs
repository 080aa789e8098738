//! In-process expiring key-value store.
//!
//! Reference backend for tests and single-process deployments; a
//! shared cache (memcached, Redis) plugs in behind the same port for
//! anything multi-instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use application::error::Result;
use application::ports::outbound::{Clock, Storage};
use async_trait::async_trait;
use serde_json::Value;

struct Entry {
    value: Value,
    expires_at: u64,
}

/// Expiring key-value store held in process memory.
///
/// Expiry is driven by the injected clock, so tests using a fixed
/// clock observe TTLs consistently. Expired entries are evicted lazily
/// on read.
pub struct InMemoryStorage {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryStorage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // A poisoned map only ever holds plain data; keep going.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let live = entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone());
        if live.is_none() {
            entries.remove(key);
        }

        Ok(live)
    }

    async fn put(&self, key: &str, value: Value, ttl_minutes: u64) -> Result<bool> {
        let expires_at = self.clock.now() + ttl_minutes * 60;
        self.lock()
            .insert(key.to_owned(), Entry { value, expires_at });

        Ok(true)
    }

    async fn put_if_absent(
        &self,
        key: &str,
        value: Value,
        ttl_minutes: u64,
    ) -> Result<bool> {
        let now = self.clock.now();
        let mut entries = self.lock();

        if let Some(entry) = entries.get(key)
            && entry.expires_at > now
        {
            return Ok(false);
        }

        let expires_at = now + ttl_minutes * 60;
        entries.insert(key.to_owned(), Entry { value, expires_at });

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::clock::FixedClock;
    use serde_json::json;

    fn storage() -> (Arc<FixedClock>, InMemoryStorage) {
        let clock = Arc::new(FixedClock::new(1_700_000_000));
        (clock.clone(), InMemoryStorage::new(clock))
    }

    #[tokio::test]
    async fn entries_expire_with_the_clock() {
        let (clock, storage) = storage();

        storage.put("k", json!(1), 5).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(json!(1)));

        clock.advance(5 * 60);
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_and_put_if_absent_does_not() {
        let (_, storage) = storage();

        assert!(storage.put_if_absent("k", json!(1), 5).await.unwrap());
        assert!(!storage.put_if_absent("k", json!(2), 5).await.unwrap());
        assert_eq!(storage.get("k").await.unwrap(), Some(json!(1)));

        assert!(storage.put("k", json!(3), 5).await.unwrap());
        assert_eq!(storage.get("k").await.unwrap(), Some(json!(3)));
    }

    #[tokio::test]
    async fn put_if_absent_reclaims_expired_entries() {
        let (clock, storage) = storage();

        storage.put_if_absent("k", json!(1), 5).await.unwrap();
        clock.advance(6 * 60);
        assert!(storage.put_if_absent("k", json!(2), 5).await.unwrap());
        assert_eq!(storage.get("k").await.unwrap(), Some(json!(2)));
    }
}
