use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::query::{decode_row, decode_rows, run_query, CacheAside};
use crate::StorageError;
use domain::User;

/// Repository for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    /// Credential lookup; uncached because cached users carry no password
    /// digest.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn create(&self, user: &User) -> Result<User, StorageError>;

    async fn update(&self, user: &User) -> Result<Option<User>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
    cache: CacheAside,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: CacheAside::new(cache, "user", cache_ttl),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        let key = self.cache.list_key("all");
        self.cache
            .get_list_or_load(&key, async {
                let rows = run_query(
                    "user.find_all",
                    sqlx::query(
                        r#"
                        SELECT id, email, name, role, password_digest, created_at
                        FROM users
                        ORDER BY email
                        "#,
                    )
                    .fetch_all(&self.pool),
                )
                .await?;
                Ok(decode_rows(&rows, "user.find_all"))
            })
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let key = self.cache.entity_key(&id);
        self.cache
            .get_or_load(&key, async {
                let row = run_query(
                    "user.find_by_id",
                    sqlx::query(
                        r#"
                        SELECT id, email, name, role, password_digest, created_at
                        FROM users
                        WHERE id = $1
                        "#,
                    )
                    .bind(id)
                    .fetch_optional(&self.pool),
                )
                .await?;
                row.as_ref()
                    .map(|row| decode_row(row, "user.find_by_id"))
                    .transpose()
            })
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = run_query(
            "user.find_by_email",
            sqlx::query(
                r#"
                SELECT id, email, name, role, password_digest, created_at
                FROM users
                WHERE LOWER(email) = LOWER($1)
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await?;
        row.as_ref()
            .map(|row| decode_row(row, "user.find_by_email"))
            .transpose()
    }

    async fn create(&self, user: &User) -> Result<User, StorageError> {
        let row = run_query(
            "user.create",
            sqlx::query(
                r#"
                INSERT INTO users (id, email, name, role, password_digest, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, email, name, role, password_digest, created_at
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.role)
            .bind(&user.password_digest)
            .bind(user.created_at)
            .fetch_one(&self.pool),
        )
        .await?;

        let created: User = decode_row(&row, "user.create")?;
        self.cache.invalidate_all().await;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn update(&self, user: &User) -> Result<Option<User>, StorageError> {
        let row = run_query(
            "user.update",
            sqlx::query(
                r#"
                UPDATE users
                SET email = $2, name = $3, role = $4, password_digest = $5
                WHERE id = $1
                RETURNING id, email, name, role, password_digest, created_at
                "#,
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.role)
            .bind(&user.password_digest)
            .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => {
                let updated: User = decode_row(&row, "user.update")?;
                self.cache.invalidate_entity(&updated.id).await;
                self.cache.invalidate_all().await;
                tracing::info!(user_id = %updated.id, "User updated");
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = run_query(
            "user.delete",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.cache.invalidate_entity(&id).await;
            self.cache.invalidate_all().await;
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(deleted)
    }
}
