use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{matches_pattern, CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process cache backed by a concurrent map.
///
/// Expired entries are dropped lazily on read and by [`prune_expired`],
/// which the binary drives on an interval.
///
/// [`prune_expired`]: MemoryCache::prune_expired
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Remove entries past their TTL. Returns the number evicted.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!("Pruned {} expired cache entries", evicted);
        }
        evicted
    }

    /// Number of live entries (for monitoring)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.expires_at > Instant::now() {
                    debug!("Cache hit for key: {}", key);
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        debug!("Cache miss for key: {}", key);
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        debug!("Cached value for key: {} with TTL: {}s", key, ttl.as_secs());
    }

    async fn delete(&self, key: &str) {
        self.entries.remove(key);
        debug!("Deleted cache for key: {}", key);
    }

    async fn delete_pattern(&self, pattern: &str) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !matches_pattern(pattern, key));
        debug!(
            "Deleted {} cache keys for pattern: {}",
            before - self.entries.len(),
            pattern
        );
    }

    async fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache.set("product:1", "{\"id\":1}", Duration::from_secs(60)).await;
        assert_eq!(cache.get("product:1").await.as_deref(), Some("{\"id\":1}"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = MemoryCache::new();
        assert!(cache.get("product:404").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_hidden() {
        let cache = MemoryCache::new();

        cache.set("product:1", "stale", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get("product:1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = MemoryCache::new();

        cache.set("product:1", "v", Duration::from_secs(60)).await;
        cache.delete("product:1").await;
        cache.delete("product:1").await;

        assert!(cache.get("product:1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_pattern_removes_only_matches() {
        let cache = MemoryCache::new();

        cache.set("product:all", "a", Duration::from_secs(60)).await;
        cache.set("product:1", "b", Duration::from_secs(60)).await;
        cache.set("order:all", "c", Duration::from_secs(60)).await;

        cache.delete_pattern("product:*").await;

        assert!(cache.get("product:all").await.is_none());
        assert!(cache.get("product:1").await.is_none());
        assert!(cache.get("order:all").await.is_some());
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let cache = MemoryCache::new();

        cache.set("stale", "a", Duration::from_millis(10)).await;
        cache.set("fresh", "b", Duration::from_secs(60)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        let evicted = cache.prune_expired();
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
    }
}
