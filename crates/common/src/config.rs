use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl CacheBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "redis" => Some(CacheBackend::Redis),
            "memory" => Some(CacheBackend::Memory),
            _ => None,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: Option<String>,
    pub ttl_seconds: u64,
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 60,
        }
    }
}

/// Application configuration, loaded once at process start
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from the environment. Missing secrets are fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            url: require_var("DATABASE_URL")?,
            max_connections: parse_var_or("DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let redis_url = std::env::var("REDIS_URL").ok();
        // REDIS_URL implies the redis backend unless CACHE_BACKEND overrides it.
        let default_backend = if redis_url.is_some() {
            CacheBackend::Redis
        } else {
            CacheBackend::Memory
        };
        let backend = match std::env::var("CACHE_BACKEND") {
            Ok(value) => CacheBackend::parse(&value).ok_or(ConfigError::InvalidVar {
                var: "CACHE_BACKEND",
                value,
            })?,
            Err(_) => default_backend,
        };
        if backend == CacheBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::MissingVar("REDIS_URL"));
        }
        let cache = CacheConfig {
            backend,
            redis_url,
            ttl_seconds: parse_var_or("CACHE_TTL_SECONDS", 300)?,
        };

        let auth = AuthConfig {
            jwt_secret: require_var("JWT_SECRET")?,
            token_expiry_secs: parse_var_or("TOKEN_EXPIRY_SECS", 86_400)?,
        };

        let server = ServerConfig {
            port: parse_var_or("PORT", 8080)?,
            request_timeout_secs: parse_var_or("REQUEST_TIMEOUT_SECS", 30)?,
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_var_or("RATE_LIMIT_MAX_REQUESTS", 100)?,
            window_secs: parse_var_or("RATE_LIMIT_WINDOW_SECS", 60)?,
        };

        Ok(Self {
            database,
            cache,
            auth,
            server,
            rate_limit,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_var_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var: name, value }),
        Err(_) => Ok(default),
    }
}
