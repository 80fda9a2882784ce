use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use domain::requests::{CreateIngredientRequest, UpdateIngredientRequest};

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.ingredients.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.ingredients.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ingredient = state.ingredients.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(ingredient)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIngredientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.ingredients.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.ingredients.delete(id).await?;
    Ok(ApiMessage::ok("Ingredient deleted"))
}
