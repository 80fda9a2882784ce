use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::{Order, OrderItem};

/// Repository for orders
///
/// `create_with_items` is the only way an order enters the system: the
/// header and all items are written in one transaction, so no partial order
/// is ever visible.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Order>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorageError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StorageError>;

    async fn find_by_status(&self, status_id: Uuid) -> Result<Vec<Order>, StorageError>;

    async fn create_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<Order, StorageError>;

    async fn update(&self, order: &Order) -> Result<Option<Order>, StorageError>;

    /// Set `completed_at` if it is currently null. Returns the updated order,
    /// or `None` when the order is missing or already completed.
    async fn complete(&self, id: Uuid) -> Result<Option<Order>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "order", cache_ttl),
        }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_all(&self) -> Result<Vec<Order>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "order.find_all",
                    sqlx::query(
                        r#"
                        SELECT id, user_id, status_id, order_date, total_amount,
                               special_instructions, completed_at
                        FROM orders
                        ORDER BY order_date DESC
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "order.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "order.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, user_id, status_id, order_date, total_amount,
                               special_instructions, completed_at
                        FROM orders
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "order.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StorageError> {
        let key = self.cache.list_key(&format!("user:{}", user_id));
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "order.find_by_user",
                    sqlx::query(
                        r#"
                        SELECT id, user_id, status_id, order_date, total_amount,
                               special_instructions, completed_at
                        FROM orders
                        WHERE user_id = $1
                        ORDER BY order_date DESC
                        "#,
                    )
                    .bind(user_id)
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "order.find_by_user"))
            })
            .await
    }

    async fn find_by_status(&self, status_id: Uuid) -> Result<Vec<Order>, StorageError> {
        let key = self.cache.list_key(&format!("status:{}", status_id));
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "order.find_by_status",
                    sqlx::query(
                        r#"
                        SELECT id, user_id, status_id, order_date, total_amount,
                               special_instructions, completed_at
                        FROM orders
                        WHERE status_id = $1
                        ORDER BY order_date DESC
                        "#,
                    )
                    .bind(status_id)
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "order.find_by_status"))
            })
            .await
    }

    async fn create_with_items(
        &self,
        order: &Order,
        items: &[OrderItem],
    ) -> Result<Order, StorageError> {
        let row = run_query("order.create_with_items", async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query(
                r#"
                INSERT INTO orders
                    (id, user_id, status_id, order_date, total_amount,
                     special_instructions, completed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, user_id, status_id, order_date, total_amount,
                          special_instructions, completed_at
                "#,
            )
            .bind(order.id)
            .bind(order.user_id)
            .bind(order.status_id)
            .bind(order.order_date)
            .bind(order.total_amount)
            .bind(&order.special_instructions)
            .bind(order.completed_at)
            .fetch_one(&mut *tx)
            .await?;

            for item in items {
                sqlx::query(
                    r#"
                    INSERT INTO order_items (id, order_id, product_id, quantity, unit_price)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(item.id)
                .bind(item.order_id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await?;

        let created: Order = decode_row(&row, "order.create_with_items")?;
        self.cache.invalidate_all().await;
        tracing::info!(
            order_id = %created.id,
            user_id = %created.user_id,
            items = items.len(),
            total_amount = created.total_amount,
            "Order created"
        );
        Ok(created)
    }

    async fn update(&self, order: &Order) -> Result<Option<Order>, StorageError> {
        let row = run_query(
            "order.update",
            sqlx::query(
                r#"
                UPDATE orders
                SET status_id = $2, special_instructions = $3
                WHERE id = $1
                RETURNING id, user_id, status_id, order_date, total_amount,
                          special_instructions, completed_at
                "#,
            )
            .bind(order.id)
            .bind(order.status_id)
            .bind(&order.special_instructions)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: Order = decode_row(&row, "order.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(order_id = %updated.id, "Order updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn complete(&self, id: Uuid) -> Result<Option<Order>, StorageError> {
        let row = run_query(
            "order.complete",
            sqlx::query(
                r#"
                UPDATE orders
                SET completed_at = $2
                WHERE id = $1 AND completed_at IS NULL
                RETURNING id, user_id, status_id, order_date, total_amount,
                          special_instructions, completed_at
                "#,
            )
            .bind(id)
            .bind(Utc::now())
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let completed: Order = decode_row(&row, "order.complete")?;
                self.cache.invalidate_entity(&completed.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(order_id = %completed.id, "Order completed");
                Ok(Some(completed))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let rows_affected = run_query("order.delete", async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let result = sqlx::query("DELETE FROM orders WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(result.rows_affected())
        })
        .await?;

        let deleted = rows_affected > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(order_id = %id, "Order deleted");
        }
        Ok(deleted)
    }
}
