use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::OrderStatus;

/// Repository for order statuses
#[async_trait]
pub trait OrderStatusRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<OrderStatus>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderStatus>, StorageError>;

    /// Case-insensitive exact-name lookup for duplicate detection; uncached.
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<OrderStatus>, StorageError>;

    async fn create(&self, status: &OrderStatus) -> Result<OrderStatus, StorageError>;

    async fn update(&self, status: &OrderStatus) -> Result<Option<OrderStatus>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of OrderStatusRepository
pub struct PostgresOrderStatusRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresOrderStatusRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "order_status", cache_ttl),
        }
    }
}

#[async_trait]
impl OrderStatusRepository for PostgresOrderStatusRepository {
    async fn find_all(&self) -> Result<Vec<OrderStatus>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "order_status.find_all",
                    sqlx::query(
                        r#"
                        SELECT id, name, description
                        FROM order_statuses
                        ORDER BY name
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "order_status.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderStatus>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "order_status.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, name, description
                        FROM order_statuses
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "order_status.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_name_ci(&self, name: &str) -> Result<Option<OrderStatus>, StorageError> {
        let row = run_query(
            "order_status.find_by_name",
            sqlx::query(
                r#"
                SELECT id, name, description
                FROM order_statuses
                WHERE LOWER(name) = LOWER($1)
                "#,
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref()
            .map(|row| decode_row(row, "order_status.find_by_name"))
            .transpose()
    }

    async fn create(&self, status: &OrderStatus) -> Result<OrderStatus, StorageError> {
        let row = run_query(
            "order_status.create",
            sqlx::query(
                r#"
                INSERT INTO order_statuses (id, name, description)
                VALUES ($1, $2, $3)
                RETURNING id, name, description
                "#,
            )
            .bind(status.id)
            .bind(&status.name)
            .bind(&status.description)
            .fetch_one(&self.pool),
        )
        .await?;

        let created: OrderStatus = decode_row(&row, "order_status.create")?;
        self.cache.invalidate_all().await;
        tracing::info!(status_id = %created.id, "Order status created");
        Ok(created)
    }

    async fn update(&self, status: &OrderStatus) -> Result<Option<OrderStatus>, StorageError> {
        let row = run_query(
            "order_status.update",
            sqlx::query(
                r#"
                UPDATE order_statuses
                SET name = $2, description = $3
                WHERE id = $1
                RETURNING id, name, description
                "#,
            )
            .bind(status.id)
            .bind(&status.name)
            .bind(&status.description)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: OrderStatus = decode_row(&row, "order_status.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(status_id = %updated.id, "Order status updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = run_query(
            "order_status.delete",
            sqlx::query("DELETE FROM order_statuses WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(status_id = %id, "Order status deleted");
        }
        Ok(deleted)
    }
}
