use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::Product;

/// Repository for products
///
/// The order workflow reads products through `find_by_id` to capture live
/// price and availability, so every mutation here invalidates before
/// returning.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError>;

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, StorageError>;

    async fn create(&self, product: &Product) -> Result<Product, StorageError>;

    async fn update(&self, product: &Product) -> Result<Option<Product>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of ProductRepository
pub struct PostgresProductRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "product", cache_ttl),
        }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "product.find_all",
                    sqlx::query(
                        r#"
                        SELECT
                            id, name, description, sku, price, is_available,
                            cost_price, stock_quantity, category_id, created_at, updated_at
                        FROM products
                        ORDER BY name
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "product.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "product.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT
                            id, name, description, sku, price, is_available,
                            cost_price, stock_quantity, category_id, created_at, updated_at
                        FROM products
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "product.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, StorageError> {
        let key = self.cache.list_key(&format!("category:{}", category_id));
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "product.find_by_category",
                    sqlx::query(
                        r#"
                        SELECT
                            id, name, description, sku, price, is_available,
                            cost_price, stock_quantity, category_id, created_at, updated_at
                        FROM products
                        WHERE category_id = $1
                        ORDER BY name
                        "#,
                    )
                    .bind(category_id)
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "product.find_by_category"))
            })
            .await
    }

    async fn create(&self, product: &Product) -> Result<Product, StorageError> {
        let row = run_query(
            "product.create",
            sqlx::query(
                r#"
                INSERT INTO products
                    (id, name, description, sku, price, is_available, cost_price,
                     stock_quantity, category_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING
                    id, name, description, sku, price, is_available,
                    cost_price, stock_quantity, category_id, created_at, updated_at
                "#,
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.sku)
            .bind(product.price)
            .bind(product.is_available)
            .bind(product.cost_price)
            .bind(product.stock_quantity)
            .bind(product.category_id)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(&self.pool),
        )
        .await?;

        let created: Product = decode_row(&row, "product.create")?;
        self.cache.invalidate_all().await;
        tracing::info!(product_id = %created.id, "Product created");
        Ok(created)
    }

    async fn update(&self, product: &Product) -> Result<Option<Product>, StorageError> {
        let row = run_query(
            "product.update",
            sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, sku = $4, price = $5, is_available = $6,
                    cost_price = $7, stock_quantity = $8, category_id = $9, updated_at = $10
                WHERE id = $1
                RETURNING
                    id, name, description, sku, price, is_available,
                    cost_price, stock_quantity, category_id, created_at, updated_at
                "#,
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.sku)
            .bind(product.price)
            .bind(product.is_available)
            .bind(product.cost_price)
            .bind(product.stock_quantity)
            .bind(product.category_id)
            .bind(product.updated_at)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: Product = decode_row(&row, "product.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(product_id = %updated.id, "Product updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = run_query(
            "product.delete",
            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(deleted)
    }
}
