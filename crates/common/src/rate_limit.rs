use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by caller identity.
///
/// Counters live in memory only; expired windows are removed either lazily on
/// the next check for the same key or by an explicit [`prune_expired`] sweep
/// driven from the binary.
///
/// [`prune_expired`]: RateLimiter::prune_expired
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            windows: DashMap::new(),
        }
    }

    /// Count one request for `key` and decide whether it is allowed.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window {
                started_at: now,
                count: 0,
            });

        // A stale window restarts instead of carrying its old count.
        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        let allowed = entry.count <= self.max_requests;
        let remaining = self.max_requests.saturating_sub(entry.count);
        let retry_after = if allowed {
            None
        } else {
            Some(self.window - now.duration_since(entry.started_at))
        };

        if !allowed {
            tracing::warn!(key = %key, count = entry.count, "Rate limit exceeded");
        }

        RateLimitDecision {
            allowed,
            remaining,
            retry_after,
        }
    }

    /// Remove windows whose period has elapsed. Returns the number evicted.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.duration_since(window.started_at) < self.window);
        let evicted = before - self.windows.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Pruned expired rate limit windows");
        }
        evicted
    }

    /// Number of tracked keys (for monitoring)
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_secs,
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = limiter(3, 60);

        for _ in 0..3 {
            assert!(limiter.check("user:1").allowed);
        }
        let decision = limiter.check("user:1");
        assert!(!decision.allowed);
        assert!(decision.retry_after.is_some());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, 60);

        assert!(limiter.check("user:1").allowed);
        assert!(!limiter.check("user:1").allowed);
        assert!(limiter.check("user:2").allowed);
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = limiter(2, 60);

        assert_eq!(limiter.check("user:1").remaining, 1);
        assert_eq!(limiter.check("user:1").remaining, 0);
    }

    #[test]
    fn test_window_resets_after_elapse() {
        let limiter = limiter(1, 1);

        assert!(limiter.check("user:1").allowed);
        assert!(!limiter.check("user:1").allowed);

        std::thread::sleep(Duration::from_millis(1100));
        assert!(limiter.check("user:1").allowed);
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let limiter = limiter(5, 1);

        limiter.check("stale");
        std::thread::sleep(Duration::from_millis(1100));
        limiter.check("fresh");

        let evicted = limiter.prune_expired();
        assert_eq!(evicted, 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
