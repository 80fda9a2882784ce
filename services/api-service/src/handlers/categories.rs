use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use domain::requests::{CreateCategoryRequest, UpdateCategoryRequest};

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.categories.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.categories.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.categories.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(category)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.categories.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.categories.delete(id).await?;
    Ok(ApiMessage::ok("Category deleted"))
}
