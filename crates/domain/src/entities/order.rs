use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Customer order header
///
/// `total_amount` is always computed server-side from the items' captured
/// unit prices. `completed_at` is set at most once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub total_amount: f64,
    pub special_instructions: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Order line item
///
/// `unit_price` is the product price captured at order time, decoupled from
/// the product's current price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 3,
            unit_price: 7.25,
        };

        assert_eq!(item.line_total(), 21.75);
    }

    #[test]
    fn test_order_serialization_round_trip() {
        let order = Order {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status_id: Uuid::new_v4(),
            order_date: Utc::now(),
            total_amount: 23.50,
            special_instructions: Some("No nuts".to_string()),
            completed_at: None,
        };

        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(order.id, deserialized.id);
        assert_eq!(order.total_amount, deserialized.total_amount);
        assert!(deserialized.completed_at.is_none());
    }
}
