use thiserror::Error;

/// Application error taxonomy, mapped to HTTP status codes at the edge.
///
/// `Database` and `Internal` keep their detail for logs only; their Display
/// output is deliberately generic.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Database error")]
    Database(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::RateLimited => 429,
            AppError::Database(_) | AppError::Internal(_) => 500,
        }
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} does not exist", entity, id))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<crate::orders::OrderPricingError> for AppError {
    fn from(err: crate::orders::OrderPricingError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Validation("bad".into()).status_code(), 400);
        assert_eq!(AppError::Unauthorized("no token".into()).status_code(), 401);
        assert_eq!(AppError::Forbidden("admins only".into()).status_code(), 403);
        assert_eq!(AppError::NotFound("gone".into()).status_code(), 404);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(AppError::RateLimited.status_code(), 429);
        assert_eq!(AppError::Database("detail".into()).status_code(), 500);
    }

    #[test]
    fn test_database_error_display_hides_detail() {
        let err = AppError::Database("connection refused to 10.0.0.5".into());
        assert_eq!(err.to_string(), "Database error");
    }

    #[test]
    fn test_not_found_helper_names_entity() {
        let err = AppError::not_found("Product", "abc");
        assert!(err.to_string().contains("Product"));
        assert!(err.to_string().contains("abc"));
    }
}
