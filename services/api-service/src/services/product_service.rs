use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::requests::{CreateProductRequest, UpdateProductRequest};
use domain::{AppError, Product};
use storage::{CategoryRepository, ProductRepository};

use super::{normalize, normalize_opt};

/// Business rules for products: referential check against categories,
/// non-negative numeric enforcement, partial-update merge.
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.find_all().await?)
    }

    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        Ok(self.products.find_by_category(category_id).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product", id))
    }

    pub async fn create(&self, request: CreateProductRequest) -> Result<Product, AppError> {
        request.validate()?;

        if self
            .categories
            .find_by_id(request.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                request.category_id
            )));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: normalize(&request.name),
            description: normalize_opt(request.description),
            sku: normalize_opt(request.sku),
            price: request.price,
            is_available: request.is_available.unwrap_or(true),
            cost_price: request.cost_price,
            stock_quantity: request.stock_quantity,
            category_id: request.category_id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.products.create(&product).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<Product, AppError> {
        request.validate()?;

        let existing = self
            .products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product", id))?;

        let category_id = request.category_id.unwrap_or(existing.category_id);
        if category_id != existing.category_id
            && self.categories.find_by_id(category_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                category_id
            )));
        }

        let merged = Product {
            id,
            name: request
                .name
                .map(|name| normalize(&name))
                .unwrap_or(existing.name),
            description: normalize_opt(request.description).or(existing.description),
            sku: normalize_opt(request.sku).or(existing.sku),
            price: request.price.unwrap_or(existing.price),
            is_available: request.is_available.unwrap_or(existing.is_available),
            cost_price: request.cost_price.unwrap_or(existing.cost_price),
            stock_quantity: request.stock_quantity.unwrap_or(existing.stock_quantity),
            category_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.products
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("Product", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Product", id))
        }
    }
}
