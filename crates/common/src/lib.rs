pub mod config;
pub mod metrics;
pub mod rate_limit;
pub mod telemetry;

pub use config::{AppConfig, CacheBackend, ConfigError};
pub use rate_limit::{RateLimitDecision, RateLimiter};
