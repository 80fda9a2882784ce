use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use domain::requests::{CreateOrderStatusRequest, UpdateOrderStatusRequest};

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.order_statuses.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.order_statuses.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.order_statuses.create(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(status)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(
        state.order_statuses.update(id, request).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.order_statuses.delete(id).await?;
    Ok(ApiMessage::ok("Order status deleted"))
}
