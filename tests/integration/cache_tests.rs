use std::sync::Arc;
use std::time::Duration;

use storage::{CacheAside, CacheStore, MemoryCache, RedisCache};

#[tokio::test]
async fn test_memory_cache_round_trip() {
    let cache = MemoryCache::new();

    cache
        .set("product:all", "[{\"id\":1}]", Duration::from_secs(60))
        .await;
    assert_eq!(
        cache.get("product:all").await.as_deref(),
        Some("[{\"id\":1}]")
    );

    cache.delete("product:all").await;
    assert!(cache.get("product:all").await.is_none());
}

#[tokio::test]
async fn test_memory_cache_pattern_invalidation() {
    let cache = MemoryCache::new();

    cache.set("product:all", "a", Duration::from_secs(60)).await;
    cache.set("product:1", "b", Duration::from_secs(60)).await;
    cache
        .set("order:user:9", "c", Duration::from_secs(60))
        .await;

    cache.delete_pattern("product:*").await;

    assert!(cache.get("product:all").await.is_none());
    assert!(cache.get("product:1").await.is_none());
    assert!(cache.get("order:user:9").await.is_some());
}

#[tokio::test]
async fn test_cache_aside_reads_hit_after_first_load() {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
    let cache = CacheAside::new(store, "product", Duration::from_secs(60));

    let first: Option<String> = cache
        .get_or_load("product:42", async { Ok(Some("concha".to_string())) })
        .await
        .unwrap();
    assert_eq!(first.as_deref(), Some("concha"));

    // The second loader would produce a different value; a cache hit means
    // it never runs.
    let second: Option<String> = cache
        .get_or_load("product:42", async { Ok(Some("changed".to_string())) })
        .await
        .unwrap();
    assert_eq!(second.as_deref(), Some("concha"));
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_redis_cache_round_trip() {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let cache = RedisCache::new(&redis_url)
        .await
        .expect("Failed to connect to Redis");

    let key = format!("it:{}", uuid::Uuid::new_v4());
    cache.set(&key, "value", Duration::from_secs(30)).await;
    assert_eq!(cache.get(&key).await.as_deref(), Some("value"));

    cache.delete(&key).await;
    assert!(cache.get(&key).await.is_none());
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_redis_cache_pattern_delete() {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let cache = RedisCache::new(&redis_url)
        .await
        .expect("Failed to connect to Redis");

    let prefix = format!("it:{}", uuid::Uuid::new_v4());
    cache
        .set(&format!("{}:1", prefix), "a", Duration::from_secs(30))
        .await;
    cache
        .set(&format!("{}:2", prefix), "b", Duration::from_secs(30))
        .await;

    cache.delete_pattern(&format!("{}:*", prefix)).await;

    assert!(cache.get(&format!("{}:1", prefix)).await.is_none());
    assert!(cache.get(&format!("{}:2", prefix)).await.is_none());
    assert!(cache.is_available().await);
}
