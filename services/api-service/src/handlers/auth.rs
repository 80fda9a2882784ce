use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use domain::requests::{LoginRequest, RegisterRequest};

use crate::responses::{ApiError, ApiResponse};
use crate::state::AppState;

/// Register a new customer account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authed = state.users.register(request).await?;
    info!(user_id = %authed.user.id, "User registered");
    Ok((StatusCode::CREATED, ApiResponse::ok(authed)))
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let authed = state.users.login(request).await?;
    Ok(ApiResponse::ok(authed))
}
