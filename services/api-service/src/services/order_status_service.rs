use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::requests::{CreateOrderStatusRequest, UpdateOrderStatusRequest};
use domain::{AppError, OrderStatus};
use storage::OrderStatusRepository;

use super::{normalize, normalize_opt};

/// Business rules for order statuses; same shape as categories.
pub struct OrderStatusService {
    statuses: Arc<dyn OrderStatusRepository>,
}

impl OrderStatusService {
    pub fn new(statuses: Arc<dyn OrderStatusRepository>) -> Self {
        Self { statuses }
    }

    pub async fn list(&self) -> Result<Vec<OrderStatus>, AppError> {
        Ok(self.statuses.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<OrderStatus, AppError> {
        self.statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order status", id))
    }

    pub async fn create(&self, request: CreateOrderStatusRequest) -> Result<OrderStatus, AppError> {
        request.validate()?;
        let name = normalize(&request.name);

        if let Some(existing) = self.statuses.find_by_name_ci(&name).await? {
            return Err(AppError::Conflict(format!(
                "Order status '{}' already exists",
                existing.name
            )));
        }

        let status = OrderStatus {
            id: Uuid::new_v4(),
            name,
            description: normalize_opt(request.description),
        };
        Ok(self.statuses.create(&status).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<OrderStatus, AppError> {
        request.validate()?;

        let existing = self
            .statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order status", id))?;

        let name = match request.name {
            Some(name) => normalize(&name),
            None => existing.name.clone(),
        };
        if let Some(other) = self.statuses.find_by_name_ci(&name).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Order status '{}' already exists",
                    other.name
                )));
            }
        }

        let merged = OrderStatus {
            id,
            name,
            description: normalize_opt(request.description).or(existing.description),
        };
        self.statuses
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("Order status", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.statuses.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Order status", id))
        }
    }
}
