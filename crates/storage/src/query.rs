use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::StorageError;

/// Execute a database future, recording metrics and wrapping any failure
/// with the operation label. Bind values never reach the logs.
pub async fn run_query<T, F>(operation: &str, fut: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let start = Instant::now();
    match fut.await {
        Ok(value) => {
            common::metrics::record_db_operation(operation, true, start.elapsed().as_secs_f64());
            Ok(value)
        }
        Err(e) => {
            common::metrics::record_db_operation(operation, false, start.elapsed().as_secs_f64());
            error!(operation = %operation, error = %e, "Database query failed");
            Err(StorageError::Database {
                operation: operation.to_string(),
                source: e,
            })
        }
    }
}

/// Decode a single row. This is the chokepoint between raw rows and typed
/// entities: a decode failure is an error, and the row is never cached.
pub fn decode_row<T>(row: &PgRow, context: &str) -> Result<T, StorageError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    T::from_row(row).map_err(|e| {
        error!(context = %context, error = %e, "Row failed schema validation");
        StorageError::RowDecode {
            context: context.to_string(),
            source: e,
        }
    })
}

/// Decode a batch of rows, skipping any row that fails validation.
///
/// Bulk reads degrade instead of failing on one bad row; each skip is logged
/// as a warning with the context label.
pub fn decode_rows<T>(rows: &[PgRow], context: &str) -> Vec<T>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    rows.iter()
        .filter_map(|row| match T::from_row(row) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(context = %context, error = %e, "Skipping row that failed schema validation");
                None
            }
        })
        .collect()
}

/// Cache-aside executor, one per repository, parameterized by that entity's
/// key prefix and TTL.
///
/// Reads check the cache first and fall back to the loader (a database
/// read); a value is cached only after the load and decode both succeed.
/// Writes invalidate; they never refresh the cache speculatively.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn CacheStore>,
    prefix: String,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn CacheStore>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
            ttl,
        }
    }

    pub fn entity_key(&self, id: &Uuid) -> String {
        format!("{}:{}", self.prefix, id)
    }

    pub fn list_key(&self, suffix: &str) -> String {
        format!("{}:{}", self.prefix, suffix)
    }

    /// Cache-aside for single-entity reads. An absent entity is returned as
    /// `None` and not cached.
    pub async fn get_or_load<T, F>(&self, key: &str, loader: F) -> Result<Option<T>, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Option<T>, StorageError>> + Send,
    {
        if let Some(raw) = self.cache.get(key).await {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    common::metrics::record_cache_request(&self.prefix, true);
                    return Ok(Some(value));
                }
                Err(e) => {
                    // A corrupt entry behaves like a miss and is evicted so it
                    // cannot shadow the database again.
                    warn!(key = %key, error = %e, "Evicting undecodable cache entry");
                    self.cache.delete(key).await;
                }
            }
        }
        common::metrics::record_cache_request(&self.prefix, false);

        let loaded = loader.await?;
        if let Some(value) = &loaded {
            self.store(key, value).await;
        }
        Ok(loaded)
    }

    /// Cache-aside for list reads. Empty lists are cached like any other
    /// successful result.
    pub async fn get_list_or_load<T, F>(&self, key: &str, loader: F) -> Result<Vec<T>, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Vec<T>, StorageError>> + Send,
    {
        if let Some(raw) = self.cache.get(key).await {
            match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(values) => {
                    common::metrics::record_cache_request(&self.prefix, true);
                    return Ok(values);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Evicting undecodable cache entry");
                    self.cache.delete(key).await;
                }
            }
        }
        common::metrics::record_cache_request(&self.prefix, false);

        let loaded = loader.await?;
        self.store(key, &loaded).await;
        Ok(loaded)
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.cache.set(key, &json, self.ttl).await,
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize value for cache"),
        }
    }

    /// Remove one cached key
    pub async fn invalidate(&self, key: &str) {
        debug!(key = %key, "Invalidating cache key");
        self.cache.delete(key).await;
    }

    /// Remove the single-entity key for `id`
    pub async fn invalidate_entity(&self, id: &Uuid) {
        self.invalidate(&self.entity_key(id)).await;
    }

    /// Remove every cached read for this entity prefix (lists included)
    pub async fn invalidate_all(&self) {
        let pattern = format!("{}:*", self.prefix);
        debug!(pattern = %pattern, "Invalidating cache pattern");
        self.cache.delete_pattern(&pattern).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_aside() -> CacheAside {
        CacheAside::new(Arc::new(MemoryCache::new()), "product", Duration::from_secs(60))
    }

    #[test]
    fn test_key_derivation() {
        let cache = cache_aside();
        let id = Uuid::nil();

        assert_eq!(
            cache.entity_key(&id),
            "product:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(cache.list_key("all"), "product:all");
    }

    #[tokio::test]
    async fn test_get_or_load_caches_after_first_load() {
        let cache = cache_aside();
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_load("product:1", async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(Some("croissant".to_string()))
                })
                .await
                .unwrap();
            assert_eq!(value.as_deref(), Some("croissant"));
        }

        // Second read is a hit; the loader runs exactly once.
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_load_absent_not_cached() {
        let cache = cache_aside();
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Option<String> = cache
                .get_or_load("product:404", async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .await
                .unwrap();
            assert!(value.is_none());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_or_load_failed_load_not_cached() {
        let cache = cache_aside();

        let result: Result<Option<String>, _> = cache
            .get_or_load("product:1", async {
                Err(StorageError::Cache("boom".to_string()))
            })
            .await;
        assert!(result.is_err());

        // The failure left nothing behind; the next load runs and succeeds.
        let value = cache
            .get_or_load("product:1", async { Ok(Some("ok".to_string())) })
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_get_list_or_load_idempotent() {
        let cache = cache_aside();
        let loads = AtomicUsize::new(0);

        for _ in 0..2 {
            let values = cache
                .get_list_or_load("product:all", async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["a".to_string(), "b".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(values, vec!["a".to_string(), "b".to_string()]);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_treated_as_miss() {
        let store = Arc::new(MemoryCache::new());
        let cache = CacheAside::new(store.clone(), "product", Duration::from_secs(60));

        store.set("product:1", "not json {", Duration::from_secs(60)).await;

        let value: Option<u32> = cache
            .get_or_load("product:1", async { Ok(Some(7)) })
            .await
            .unwrap();
        assert_eq!(value, Some(7));

        // The corrupt entry was replaced by the loaded value.
        assert_eq!(store.get("product:1").await.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_invalidate_entity_and_lists() {
        let store = Arc::new(MemoryCache::new());
        let cache = CacheAside::new(store.clone(), "product", Duration::from_secs(60));
        let id = Uuid::new_v4();

        store
            .set(&cache.entity_key(&id), "\"v\"", Duration::from_secs(60))
            .await;
        store.set("product:all", "[]", Duration::from_secs(60)).await;
        store.set("order:all", "[]", Duration::from_secs(60)).await;

        cache.invalidate_entity(&id).await;
        cache.invalidate_all().await;

        assert!(store.get(&cache.entity_key(&id)).await.is_none());
        assert!(store.get("product:all").await.is_none());
        assert!(store.get("order:all").await.is_some());
    }
}
