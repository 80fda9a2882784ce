use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::OrderItem;

/// Repository for order items
///
/// Item mutations recompute the parent order's total in the same
/// transaction, keeping the order invariant (total = sum of line totals)
/// intact, and invalidate both the item and order caches.
#[async_trait]
pub trait OrderItemRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderItem>, StorageError>;

    async fn find_by_order(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StorageError>;

    async fn update_quantity(
        &self,
        id: Uuid,
        quantity: i32,
    ) -> Result<Option<OrderItem>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of OrderItemRepository
pub struct PostgresOrderItemRepository {
    pool: PgPool,
    cache: CacheAside,
    order_cache: CacheAside,
}

impl PostgresOrderItemRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache.clone(), "order_item", cache_ttl),
            order_cache: CacheAside::new(cache, "order", cache_ttl),
        }
    }

    async fn invalidate_item_and_order(&self, item_id: &Uuid) {
        self.cache.invalidate_entity(item_id).await;
        self.cache.invalidate_all().await;
        // Totals changed, so cached order reads are stale too.
        self.order_cache.invalidate_all().await;
    }
}

#[async_trait]
impl OrderItemRepository for PostgresOrderItemRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderItem>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "order_item.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, order_id, product_id, quantity, unit_price
                        FROM order_items
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "order_item.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_order(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StorageError> {
        let key = self.cache.list_key(&format!("order:{}", order_id));
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "order_item.find_by_order",
                    sqlx::query(
                        r#"
                        SELECT id, order_id, product_id, quantity, unit_price
                        FROM order_items
                        WHERE order_id = $1
                        ORDER BY id
                        "#,
                    )
                    .bind(order_id)
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "order_item.find_by_order"))
            })
            .await
    }

    async fn update_quantity(
        &self,
        id: Uuid,
        quantity: i32,
    ) -> Result<Option<OrderItem>, StorageError> {
        let row = run_query("order_item.update_quantity", async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query(
                r#"
                UPDATE order_items
                SET quantity = $2
                WHERE id = $1
                RETURNING id, order_id, product_id, quantity, unit_price
                "#,
            )
            .bind(id)
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = &row {
                let order_id: Uuid = sqlx::Row::try_get(row, "order_id")?;
                sqlx::query(
                    r#"
                    UPDATE orders
                    SET total_amount = (
                        SELECT COALESCE(SUM(quantity * unit_price), 0)
                        FROM order_items
                        WHERE order_id = $1
                    )
                    WHERE id = $1
                    "#,
                )
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(row)
        })
        .await?;

        match row {
            Some(row) => {
                let updated: OrderItem = decode_row(&row, "order_item.update_quantity")?;
                self.invalidate_item_and_order(&updated.id).await;
                tracing::info!(
                    order_item_id = %updated.id,
                    quantity = updated.quantity,
                    "Order item quantity updated"
                );
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let deleted = run_query("order_item.delete", async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query("DELETE FROM order_items WHERE id = $1 RETURNING order_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(row) = &row {
                let order_id: Uuid = sqlx::Row::try_get(row, "order_id")?;
                sqlx::query(
                    r#"
                    UPDATE orders
                    SET total_amount = (
                        SELECT COALESCE(SUM(quantity * unit_price), 0)
                        FROM order_items
                        WHERE order_id = $1
                    )
                    WHERE id = $1
                    "#,
                )
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(row.is_some())
        })
        .await?;

        if deleted {
            self.invalidate_item_and_order(&id).await;
            tracing::info!(order_item_id = %id, "Order item deleted");
        }
        Ok(deleted)
    }
}
