use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use domain::requests::{CreateProductRequest, UpdateProductRequest};

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    pub category_id: Option<Uuid>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let products = match params.category_id {
        Some(category_id) => state.products.list_by_category(category_id).await?,
        None => state.products.list().await?,
    };
    Ok(ApiResponse::ok(products))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.products.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.products.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.products.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.products.delete(id).await?;
    Ok(ApiMessage::ok("Product deleted"))
}
