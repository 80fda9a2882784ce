pub mod cache;
pub mod query;
pub mod repositories;

pub use cache::{CacheStore, MemoryCache, RedisCache};
pub use query::{decode_row, decode_rows, run_query, CacheAside};
pub use repositories::{
    CategoryRepository, IngredientRepository, OrderItemRepository, OrderRepository,
    OrderStatusRepository, PostgresCategoryRepository, PostgresIngredientRepository,
    PostgresOrderItemRepository, PostgresOrderRepository, PostgresOrderStatusRepository,
    PostgresProductRepository, PostgresUserRepository, ProductRepository, UserRepository,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error during {operation}")]
    Database {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Row validation failed in {context}")]
    RowDecode {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<StorageError> for domain::AppError {
    fn from(err: StorageError) -> Self {
        // Detail was already logged at the failure site with its operation
        // label; the taxonomy carries only the short description.
        domain::AppError::Database(err.to_string())
    }
}
