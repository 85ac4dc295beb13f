//! TTL-based cache for ephemeral state.
//!
//! Provides a thread-safe cache where every entry carries its own expiry, and
//! an in-process [`CachePort`] built on it. Expired entries are invisible to
//! readers but occupy memory until `cleanup_expired()` runs.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::infrastructure::ports::{CacheError, CachePort};

/// A thread-safe cache with per-entry time-to-live expiration.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, TtlEntry<V>>>,
}

struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> TtlEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a value, replacing any existing entry and restarting its TTL.
    pub async fn insert(&self, key: K, value: V, ttl: Duration) {
        let entry = TtlEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Get a value if it exists and hasn't expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let guard = self.entries.read().await;
        guard
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Remove and return a value if it exists (regardless of expiration).
    pub async fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().await.remove(key).map(|e| e.value)
    }

    /// Remove several keys under one lock.
    pub async fn remove_many<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut guard = self.entries.write().await;
        keys.into_iter()
            .filter(|key| guard.remove(*key).is_some())
            .count()
    }

    /// Check if a key exists and hasn't expired.
    pub async fn contains(&self, key: &K) -> bool {
        let now = Instant::now();
        let guard = self.entries.read().await;
        guard.get(key).is_some_and(|entry| entry.is_live(now))
    }

    /// Remove all expired entries and return the count of removed entries.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.entries.write().await;
        let before_count = guard.len();
        guard.retain(|_, entry| entry.is_live(now));
        before_count - guard.len()
    }

    /// Get the current number of entries (including expired ones not yet cleaned).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// In-process key-value cache backing the character cache.
#[derive(Default)]
pub struct InMemoryCache {
    entries: TtlCache<String, Vec<u8>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries; the engine runs this on a timer.
    pub async fn sweep(&self) -> usize {
        let removed = self.entries.cleanup_expired().await;
        if removed > 0 {
            tracing::debug!(removed, "Swept expired cache entries");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.len().await
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(&key.to_string()).await)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value, ttl).await;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        self.entries.remove_many(keys.iter()).await;
        Ok(())
    }
}
