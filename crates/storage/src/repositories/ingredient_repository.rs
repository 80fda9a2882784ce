use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::Ingredient;

/// Repository for ingredients
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Ingredient>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ingredient>, StorageError>;

    /// Case-insensitive exact-name lookup for duplicate detection; uncached.
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Ingredient>, StorageError>;

    async fn create(&self, ingredient: &Ingredient) -> Result<Ingredient, StorageError>;

    async fn update(&self, ingredient: &Ingredient) -> Result<Option<Ingredient>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of IngredientRepository
pub struct PostgresIngredientRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresIngredientRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "ingredient", cache_ttl),
        }
    }
}

#[async_trait]
impl IngredientRepository for PostgresIngredientRepository {
    async fn find_all(&self) -> Result<Vec<Ingredient>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "ingredient.find_all",
                    sqlx::query(
                        r#"
                        SELECT id, name, description, unit, created_at, updated_at
                        FROM ingredients
                        ORDER BY name
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "ingredient.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ingredient>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "ingredient.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, name, description, unit, created_at, updated_at
                        FROM ingredients
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "ingredient.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Ingredient>, StorageError> {
        let row = run_query(
            "ingredient.find_by_name",
            sqlx::query(
                r#"
                SELECT id, name, description, unit, created_at, updated_at
                FROM ingredients
                WHERE LOWER(name) = LOWER($1)
                "#,
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref()
            .map(|row| decode_row(row, "ingredient.find_by_name"))
            .transpose()
    }

    async fn create(&self, ingredient: &Ingredient) -> Result<Ingredient, StorageError> {
        let row = run_query(
            "ingredient.create",
            sqlx::query(
                r#"
                INSERT INTO ingredients (id, name, description, unit, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, name, description, unit, created_at, updated_at
                "#,
            )
            .bind(ingredient.id)
            .bind(&ingredient.name)
            .bind(&ingredient.description)
            .bind(&ingredient.unit)
            .bind(ingredient.created_at)
            .bind(ingredient.updated_at)
            .fetch_one(&self.pool),
        )
        .await?;

        let created: Ingredient = decode_row(&row, "ingredient.create")?;
        self.cache.invalidate_all().await;
        tracing::info!(ingredient_id = %created.id, "Ingredient created");
        Ok(created)
    }

    async fn update(&self, ingredient: &Ingredient) -> Result<Option<Ingredient>, StorageError> {
        let row = run_query(
            "ingredient.update",
            sqlx::query(
                r#"
                UPDATE ingredients
                SET name = $2, description = $3, unit = $4, updated_at = $5
                WHERE id = $1
                RETURNING id, name, description, unit, created_at, updated_at
                "#,
            )
            .bind(ingredient.id)
            .bind(&ingredient.name)
            .bind(&ingredient.description)
            .bind(&ingredient.unit)
            .bind(ingredient.updated_at)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: Ingredient = decode_row(&row, "ingredient.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(ingredient_id = %updated.id, "Ingredient updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = run_query(
            "ingredient.delete",
            sqlx::query("DELETE FROM ingredients WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(ingredient_id = %id, "Ingredient deleted");
        }
        Ok(deleted)
    }
}
