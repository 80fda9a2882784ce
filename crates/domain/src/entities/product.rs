use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sellable bakery product
///
/// `price` is the live selling price consulted at order time; order items
/// capture their own copy so historical orders survive price changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price: f64,
    pub is_available: bool,
    pub cost_price: f64,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
