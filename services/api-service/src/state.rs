use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use common::{AppConfig, CacheBackend, RateLimiter};
use storage::{
    CacheStore, CategoryRepository, IngredientRepository, MemoryCache, OrderItemRepository,
    OrderRepository, OrderStatusRepository, PostgresCategoryRepository,
    PostgresIngredientRepository, PostgresOrderItemRepository, PostgresOrderRepository,
    PostgresOrderStatusRepository, PostgresProductRepository, PostgresUserRepository,
    ProductRepository, RedisCache, UserRepository,
};

use crate::auth::AuthKeys;
use crate::services::{
    CategoryService, IngredientService, OrderService, OrderStatusService, ProductService,
    UserService,
};

/// Application state shared across handlers.
///
/// Every resource is constructed once here and injected; nothing in the
/// process reaches for a global client.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: Arc<dyn CacheStore>,
    /// Present only when the in-process backend is selected; drives the
    /// periodic eviction sweep.
    pub memory_cache: Option<Arc<MemoryCache>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub auth_keys: Arc<AuthKeys>,
    pub categories: Arc<CategoryService>,
    pub ingredients: Arc<IngredientService>,
    pub order_statuses: Arc<OrderStatusService>,
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!("Database connected");

        let (cache, memory_cache): (Arc<dyn CacheStore>, Option<Arc<MemoryCache>>) =
            match config.cache.backend {
                CacheBackend::Redis => {
                    tracing::info!("Connecting to Redis...");
                    let redis_url = config
                        .cache
                        .redis_url
                        .as_deref()
                        .ok_or_else(|| anyhow::anyhow!("redis backend requires REDIS_URL"))?;
                    let cache = Arc::new(RedisCache::new(redis_url).await?);
                    tracing::info!("Redis connected");
                    (cache, None)
                }
                CacheBackend::Memory => {
                    tracing::info!("Using in-process cache");
                    let cache = Arc::new(MemoryCache::new());
                    (cache.clone(), Some(cache))
                }
            };

        if !cache.is_available().await {
            tracing::warn!("Cache backend unavailable at startup; reads will fall back to the database");
        }

        let ttl = Duration::from_secs(config.cache.ttl_seconds);

        let categories: Arc<dyn CategoryRepository> = Arc::new(PostgresCategoryRepository::new(
            pool.clone(),
            cache.clone(),
            ttl,
        ));
        let ingredients: Arc<dyn IngredientRepository> = Arc::new(
            PostgresIngredientRepository::new(pool.clone(), cache.clone(), ttl),
        );
        let order_statuses: Arc<dyn OrderStatusRepository> = Arc::new(
            PostgresOrderStatusRepository::new(pool.clone(), cache.clone(), ttl),
        );
        let products: Arc<dyn ProductRepository> = Arc::new(PostgresProductRepository::new(
            pool.clone(),
            cache.clone(),
            ttl,
        ));
        let orders: Arc<dyn OrderRepository> = Arc::new(PostgresOrderRepository::new(
            pool.clone(),
            cache.clone(),
            ttl,
        ));
        let order_items: Arc<dyn OrderItemRepository> = Arc::new(
            PostgresOrderItemRepository::new(pool.clone(), cache.clone(), ttl),
        );
        let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(
            pool.clone(),
            cache.clone(),
            ttl,
        ));

        let auth_keys = Arc::new(AuthKeys::new(
            &config.auth.jwt_secret,
            config.auth.token_expiry_secs,
        ));

        Ok(Self {
            pool,
            cache,
            memory_cache,
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            auth_keys: auth_keys.clone(),
            categories: Arc::new(CategoryService::new(categories.clone())),
            ingredients: Arc::new(IngredientService::new(ingredients)),
            order_statuses: Arc::new(OrderStatusService::new(order_statuses.clone())),
            products: Arc::new(ProductService::new(products.clone(), categories)),
            orders: Arc::new(OrderService::new(
                orders,
                order_items,
                products,
                order_statuses,
            )),
            users: Arc::new(UserService::new(users, auth_keys)),
        })
    }
}
