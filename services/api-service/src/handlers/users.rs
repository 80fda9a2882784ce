use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use domain::requests::{CreateUserRequest, UpdateUserRequest};

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.users.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.users.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(user)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.users.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.delete(id).await?;
    Ok(ApiMessage::ok("User deleted"))
}
