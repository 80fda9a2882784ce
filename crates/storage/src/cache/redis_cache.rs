use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::cache::CacheStore;
use crate::StorageError;

/// Redis-backed cache
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Create new Redis cache
    pub async fn new(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| StorageError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StorageError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis cache initialized");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.conn.clone().get::<_, String>(key).await {
            Ok(value) => {
                debug!("Cache hit for key: {}", key);
                Some(value)
            }
            Err(e) => {
                if matches!(e.kind(), redis::ErrorKind::TypeError) {
                    debug!("Cache miss for key: {}", key);
                } else {
                    warn!("Redis error for key {}: {}", key, e);
                }
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let result: Result<(), RedisError> = self
            .conn
            .clone()
            .set_ex(key, value, ttl.as_secs())
            .await;

        match result {
            Ok(_) => {
                debug!("Cached value for key: {} with TTL: {}s", key, ttl.as_secs());
            }
            Err(e) => {
                error!("Failed to set cache for key {}: {}", key, e);
            }
        }
    }

    async fn delete(&self, key: &str) {
        let result: Result<(), RedisError> = self.conn.clone().del(key).await;

        match result {
            Ok(_) => {
                debug!("Deleted cache for key: {}", key);
            }
            Err(e) => {
                error!("Failed to delete cache for key {}: {}", key, e);
            }
        }
    }

    async fn delete_pattern(&self, pattern: &str) {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut deleted: usize = 0;

        loop {
            let result: Result<(u64, Vec<String>), RedisError> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await;

            match result {
                Ok((next_cursor, keys)) => {
                    if !keys.is_empty() {
                        deleted += keys.len();
                        let del_result: Result<(), RedisError> = conn.del(keys).await;
                        if let Err(e) = del_result {
                            error!("Failed to delete keys for pattern {}: {}", pattern, e);
                            return;
                        }
                    }
                    cursor = next_cursor;
                    if cursor == 0 {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to scan keys for pattern {}: {}", pattern, e);
                    return;
                }
            }
        }

        debug!("Deleted {} cache keys for pattern: {}", deleted, pattern);
    }

    async fn is_available(&self) -> bool {
        let result: Result<String, RedisError> = redis::cmd("PING")
            .query_async(&mut self.conn.clone())
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                warn!("Redis ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Redis to be running
    async fn test_cache_operations() {
        let cache = RedisCache::new("redis://localhost:6379")
            .await
            .expect("Failed to connect to Redis");

        let key = format!("test:{}", uuid::Uuid::new_v4());
        cache.set(&key, "{\"test\":\"data\"}", Duration::from_secs(60)).await;

        let cached = cache.get(&key).await;
        assert_eq!(cached.as_deref(), Some("{\"test\":\"data\"}"));

        cache.delete(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Redis to be running
    async fn test_delete_pattern() {
        let cache = RedisCache::new("redis://localhost:6379")
            .await
            .expect("Failed to connect to Redis");

        cache.set("pattest:1", "a", Duration::from_secs(60)).await;
        cache.set("pattest:2", "b", Duration::from_secs(60)).await;
        cache.set("patother:1", "c", Duration::from_secs(60)).await;

        cache.delete_pattern("pattest:*").await;

        assert!(cache.get("pattest:1").await.is_none());
        assert!(cache.get("pattest:2").await.is_none());
        assert!(cache.get("patother:1").await.is_some());

        cache.delete("patother:1").await;
    }

    #[tokio::test]
    #[ignore] // Requires Redis to be running
    async fn test_ping() {
        let cache = RedisCache::new("redis://localhost:6379")
            .await
            .expect("Failed to connect to Redis");

        assert!(cache.is_available().await);
    }
}
