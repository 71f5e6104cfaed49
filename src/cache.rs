use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A thread-safe cache with per-entry TTL (time-to-live)
///
/// Expired entries are evicted lazily when they are read, or in bulk by
/// [`TtlCache::cleanup`].
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Get a value from the cache if it exists and hasn't expired
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.evict_if_expired(key);
            None
        }
    }

    /// Remove `key` only if it is still expired; a concurrent insert may have
    /// refreshed it since it was read
    fn evict_if_expired(&self, key: &K) {
        self.data
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
    }

    /// Insert a value that expires `ttl` from now, replacing any previous entry
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.data.insert(key, entry);
    }

    /// Remove expired entries from the cache
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries in the cache (including expired ones)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Key/value store the weather service memoizes into.
///
/// Values are serialized records. Implementations must at least expire
/// entries lazily on read; single-key atomicity is the only consistency
/// required.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a live entry; expired entries read as a miss
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` for `ttl`, overwriting any previous entry
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// In-process [`CacheStore`] backed by a [`TtlCache`]
///
/// Once the map reaches the sweep threshold (initially `max_entries`), the
/// next write sweeps out expired entries. The threshold then moves to twice
/// the surviving entry count (never below `max_entries`), so a map full of
/// live entries is not rescanned on every write.
pub struct MemoryCacheStore {
    cache: TtlCache<String, String>,
    max_entries: usize,
    next_sweep_at: AtomicUsize,
}

impl MemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: TtlCache::new(),
            max_entries,
            next_sweep_at: AtomicUsize::new(max_entries),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(&key.to_string())
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let before = self.cache.len();
        if before >= self.next_sweep_at.load(Ordering::Relaxed) {
            self.cache.cleanup();
            let after = self.cache.len();
            let next = after.saturating_mul(2).max(self.max_entries);
            self.next_sweep_at.store(next, Ordering::Relaxed);
            tracing::debug!(
                removed = before.saturating_sub(after),
                remaining = after,
                next_sweep_at = next,
                "Weather cache sweep completed"
            );
        }
        self.cache.insert(key.to_string(), value, ttl);
    }
}
