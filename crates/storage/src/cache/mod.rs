pub mod memory_cache;
pub mod redis_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;

use async_trait::async_trait;
use std::time::Duration;

/// Uniform key/value cache contract shared by every repository.
///
/// The cache is best-effort: backend failures are logged and swallowed by
/// implementations, never surfaced to callers. The database remains the
/// source of truth on every path.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a key. Miss, deserialization failure, and backend failure all
    /// return `None`.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value with a TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration);

    /// Remove one entry; idempotent.
    async fn delete(&self, key: &str);

    /// Remove all entries whose key matches a `*` wildcard pattern.
    async fn delete_pattern(&self, pattern: &str);

    /// Health probe, used by startup and readiness checks only.
    async fn is_available(&self) -> bool;
}

/// Match a key against a glob pattern where `*` matches any run of
/// characters. Used by the in-process backend; Redis evaluates the same
/// pattern server-side in SCAN.
pub(crate) fn matches_pattern(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').collect();
    let mut remaining = key;

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            match remaining.strip_prefix(segment) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if i == segments.len() - 1 && !pattern.ends_with('*') {
            return remaining.ends_with(segment);
        } else {
            match remaining.find(segment) {
                Some(pos) => remaining = &remaining[pos + segment.len()..],
                None => return false,
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_without_wildcard() {
        assert!(matches_pattern("product:all", "product:all"));
        assert!(!matches_pattern("product:all", "product:all:extra"));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(matches_pattern("product:*", "product:all"));
        assert!(matches_pattern("product:*", "product:1234"));
        assert!(!matches_pattern("product:*", "order:all"));
    }

    #[test]
    fn test_inner_wildcard() {
        assert!(matches_pattern("order:user:*", "order:user:42"));
        assert!(matches_pattern("*:all", "ingredient:all"));
        assert!(!matches_pattern("*:all", "ingredient:1"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(matches_pattern("order:*:user:*", "order:list:user:9"));
        assert!(!matches_pattern("order:*:user:*", "order:list:status:9"));
    }
}
