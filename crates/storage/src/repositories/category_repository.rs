use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::Category;

/// Repository for product categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Category>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StorageError>;

    /// Case-insensitive exact-name lookup for duplicate detection; uncached.
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Category>, StorageError>;

    async fn create(&self, category: &Category) -> Result<Category, StorageError>;

    async fn update(&self, category: &Category) -> Result<Option<Category>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of CategoryRepository
pub struct PostgresCategoryRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "category", cache_ttl),
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "category.find_all",
                    sqlx::query(
                        r#"
                        SELECT id, name, description, created_at, updated_at
                        FROM categories
                        ORDER BY name
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "category.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "category.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, name, description, created_at, updated_at
                        FROM categories
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "category.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Category>, StorageError> {
        let row = run_query(
            "category.find_by_name",
            sqlx::query(
                r#"
                SELECT id, name, description, created_at, updated_at
                FROM categories
                WHERE LOWER(name) = LOWER($1)
                "#,
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref()
            .map(|row| decode_row(row, "category.find_by_name"))
            .transpose()
    }

    async fn create(&self, category: &Category) -> Result<Category, StorageError> {
        let row = run_query(
            "category.create",
            sqlx::query(
                r#"
                INSERT INTO categories (id, name, description, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, name, description, created_at, updated_at
                "#,
            )
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&self.pool),
        )
        .await?;

        let created: Category = decode_row(&row, "category.create")?;
        self.cache.invalidate_all().await;
        tracing::info!(category_id = %created.id, "Category created");
        Ok(created)
    }

    async fn update(&self, category: &Category) -> Result<Option<Category>, StorageError> {
        let row = run_query(
            "category.update",
            sqlx::query(
                r#"
                UPDATE categories
                SET name = $2, description = $3, updated_at = $4
                WHERE id = $1
                RETURNING id, name, description, created_at, updated_at
                "#,
            )
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.updated_at)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: Category = decode_row(&row, "category.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(category_id = %updated.id, "Category updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = run_query(
            "category.delete",
            sqlx::query("DELETE FROM categories WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(deleted)
    }
}
