pub mod category_service;
pub mod ingredient_service;
pub mod order_service;
pub mod order_status_service;
pub mod product_service;
pub mod user_service;

pub use category_service::CategoryService;
pub use ingredient_service::IngredientService;
pub use order_service::{OrderService, OrderWithItems};
pub use order_status_service::OrderStatusService;
pub use product_service::ProductService;
pub use user_service::{AuthenticatedUser, UserService};

/// Trim surrounding whitespace from a required string field
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional string field, dropping it entirely when blank
pub(crate) fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("  Pasteles  "), "Pasteles");
    }

    #[test]
    fn test_normalize_opt_drops_blank() {
        assert_eq!(normalize_opt(Some("  ".to_string())), None);
        assert_eq!(normalize_opt(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(normalize_opt(None), None);
    }
}
