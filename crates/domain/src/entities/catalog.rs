use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw ingredient tracked for bakery products
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order lifecycle status (e.g. "pending", "ready", "delivered")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderStatus {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization_round_trip() {
        let category = Category {
            id: Uuid::new_v4(),
            name: "Pasteles".to_string(),
            description: Some("Cakes and pastries".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();

        assert_eq!(category.id, deserialized.id);
        assert_eq!(category.name, deserialized.name);
    }
}
