use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to create a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Partial update for a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request to create an ingredient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateIngredientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 20, message = "Unit must be at most 20 characters"))]
    pub unit: Option<String>,
}

/// Partial update for an ingredient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateIngredientRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 20, message = "Unit must be at most 20 characters"))]
    pub unit: Option<String>,
}

/// Request to create an order status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderStatusRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Partial update for an order status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request to create a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "SKU must be at most 50 characters"))]
    pub sku: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    pub is_available: Option<bool>,

    #[validate(range(min = 0.0, message = "Cost price cannot be negative"))]
    pub cost_price: f64,

    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,

    pub category_id: Uuid,
}

/// Partial update for a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "SKU must be at most 50 characters"))]
    pub sku: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub is_available: Option<bool>,

    #[validate(range(min = 0.0, message = "Cost price cannot be negative"))]
    pub cost_price: Option<f64>,

    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: Option<i32>,

    pub category_id: Option<Uuid>,
}

/// Line item in an order creation request.
///
/// Carries no price: unit prices are read from the product records when the
/// order is created, never from the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItemRequest {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

/// Request to create an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub status_id: Uuid,

    #[validate(length(min = 1, message = "Order must have at least one item"), nested)]
    pub items: Vec<CreateOrderItemRequest>,

    #[validate(length(max = 500, message = "Instructions must be at most 500 characters"))]
    pub special_instructions: Option<String>,
}

/// Partial update for an order (status change, instructions)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    pub status_id: Option<Uuid>,

    #[validate(length(max = 500, message = "Instructions must be at most 500 characters"))]
    pub special_instructions: Option<String>,
}

/// Quantity change for an existing order item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderItemRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

/// Self-service registration (always a customer)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Credential login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Admin partial update for a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    pub role: Option<crate::entities::Role>,
}

/// Admin user creation with an explicit role
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    pub role: crate::entities::Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_validation() {
        let req = CreateOrderRequest {
            status_id: Uuid::new_v4(),
            items: vec![CreateOrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: 2,
            }],
            special_instructions: None,
        };

        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_order_request_empty_items_fails() {
        let req = CreateOrderRequest {
            status_id: Uuid::new_v4(),
            items: vec![],
            special_instructions: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_order_item_zero_quantity_fails() {
        let item = CreateOrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 0,
        };

        assert!(item.validate().is_err());
    }

    #[test]
    fn test_create_product_negative_price_fails() {
        let req = CreateProductRequest {
            name: "Concha".to_string(),
            description: None,
            sku: None,
            price: -1.0,
            is_available: None,
            cost_price: 0.0,
            stock_quantity: 0,
            category_id: Uuid::new_v4(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_short_password_fails() {
        let req = RegisterRequest {
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            password: "short".to_string(),
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_invalid_email_fails() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "Ana".to_string(),
            password: "longenough".to_string(),
        };

        assert!(req.validate().is_err());
    }
}
