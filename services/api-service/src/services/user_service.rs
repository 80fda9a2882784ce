use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::requests::{CreateUserRequest, LoginRequest, RegisterRequest, UpdateUserRequest};
use domain::{AppError, Role, User};
use storage::UserRepository;

use crate::auth::{hash_password, verify_password, AuthKeys};

use super::normalize;

/// A user plus the token minted for them
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    pub token: String,
    pub user: User,
}

/// Registration, login, and user administration.
///
/// Login failures never reveal whether the email or the password was wrong.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    auth_keys: Arc<AuthKeys>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, auth_keys: Arc<AuthKeys>) -> Self {
        Self { users, auth_keys }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthenticatedUser, AppError> {
        request.validate()?;
        self.insert_user(request.email, request.name, &request.password, Role::Customer)
            .await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .users
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password_digest, &request.password) {
            return Err(invalid());
        }

        let token = self.auth_keys.mint_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthenticatedUser { token, user })
    }

    /// Admin-only creation with an explicit role
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        request.validate()?;
        let created = self
            .insert_user(request.email, request.name, &request.password, request.role)
            .await?;
        Ok(created.user)
    }

    async fn insert_user(
        &self,
        email: String,
        name: String,
        password: &str,
        role: Role,
    ) -> Result<AuthenticatedUser, AppError> {
        let email = email.trim().to_lowercase();

        if let Some(existing) = self.users.find_by_email(&email).await? {
            return Err(AppError::Conflict(format!(
                "A user with email '{}' already exists",
                existing.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            name: normalize(&name),
            role: role.as_str().to_string(),
            password_digest: hash_password(password),
            created_at: Utc::now(),
        };
        let created = self.users.create(&user).await?;
        let token = self.auth_keys.mint_token(&created)?;
        Ok(AuthenticatedUser {
            token,
            user: created,
        })
    }

    /// Admin partial update: merge supplied fields over the existing row
    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, AppError> {
        request.validate()?;

        let existing = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;

        let email = match request.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != id {
                        return Err(AppError::Conflict(format!(
                            "A user with email '{}' already exists",
                            other.email
                        )));
                    }
                }
                email
            }
            None => existing.email.clone(),
        };

        // Cached reads drop the digest, so updates must start from the
        // credential lookup when the password is unchanged.
        let password_digest = match request.password {
            Some(password) => hash_password(&password),
            None => {
                self.users
                    .find_by_email(&existing.email)
                    .await?
                    .ok_or_else(|| AppError::not_found("User", id))?
                    .password_digest
            }
        };

        let merged = User {
            id,
            email,
            name: request
                .name
                .map(|name| normalize(&name))
                .unwrap_or(existing.name),
            role: request
                .role
                .map(|role| role.as_str().to_string())
                .unwrap_or(existing.role),
            password_digest,
            created_at: existing.created_at,
        };
        self.users
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.users.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("User", id))
        }
    }
}
