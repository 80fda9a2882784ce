use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use tracing::info;
use uuid::Uuid;

use domain::requests::{CreateOrderRequest, UpdateOrderRequest};
use domain::AppError;

use crate::auth::Claims;
use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

/// Create an order for the authenticated user
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(user_id = %claims.sub, items = request.items.len(), "Received order creation request");
    let order = state.orders.create(claims.sub, request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(order)))
}

/// Admins see every order; customers see their own
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = if claims.is_admin() {
        state.orders.list().await?
    } else {
        state.orders.list_by_user(claims.sub).await?
    };
    Ok(ApiResponse::ok(orders))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.get(id).await?;
    if !claims.is_admin() && order.order.user_id != claims.sub {
        return Err(AppError::Forbidden("You can only view your own orders".to_string()).into());
    }
    Ok(ApiResponse::ok(order))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.orders.update(id, request).await?))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.orders.complete(id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.orders.delete(id).await?;
    Ok(ApiMessage::ok("Order deleted"))
}

/// Admin listing of orders in a given status
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.orders.list_by_status(status_id).await?))
}

/// List the line items of an order the caller may see
pub async fn list_items(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.get(id).await?;
    if !claims.is_admin() && order.order.user_id != claims.sub {
        return Err(AppError::Forbidden("You can only view your own orders".to_string()).into());
    }
    Ok(ApiResponse::ok(order.items))
}
