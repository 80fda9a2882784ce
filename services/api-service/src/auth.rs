use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use domain::{AppError, Role, User};

use crate::responses::ApiError;
use crate::state::AppState;

/// Claims carried by bakery access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// HS256 key material derived once from the configured secret
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_secs: u64,
}

impl AuthKeys {
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    /// Mint a signed token for a user
    pub fn mint_token(&self, user: &User) -> Result<String, AppError> {
        let role = user
            .role()
            .ok_or_else(|| AppError::Internal(format!("User {} has unknown role", user.id)))?;

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            name: user.name.clone(),
            role,
            iat: now,
            exp: now + self.expiry_secs as i64,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token's signature and expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

/// Extract the bearer token and verify it
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Claims, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    state.auth_keys.verify_token(token)
}

/// Middleware gate: any authenticated user
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Middleware gate: admin role required
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state, request.headers())?;
    if !claims.is_admin() {
        tracing::warn!(user_id = %claims.sub, "Admin-only route denied");
        return Err(AppError::Forbidden("Admin access required".to_string()).into());
    }
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Produce a salted digest in `salt$hex` form.
///
/// The digest format is isolated here so the scheme can be swapped without
/// touching callers.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let salt_hex = hex::encode(salt);
    let digest = digest_with_salt(&salt_hex, password);
    format!("{}${}", salt_hex, digest)
}

/// Check a password against a stored `salt$hex` digest
pub fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => digest_with_salt(salt, password) == digest,
        None => false,
    }
}

fn digest_with_salt(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
