use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use domain::requests::UpdateOrderItemRequest;
use validator::Validate;

use crate::responses::{ApiError, ApiMessage, ApiResponse};
use crate::state::AppState;

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ApiResponse::ok(state.orders.get_item(id).await?))
}

/// Change an item's quantity; the parent order total follows in the same
/// transaction.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().map_err(domain::AppError::from)?;
    let item = state
        .orders
        .update_item_quantity(id, request.quantity)
        .await?;
    Ok(ApiResponse::ok(item))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.orders.delete_item(id).await?;
    Ok(ApiMessage::ok("Order item deleted"))
}
