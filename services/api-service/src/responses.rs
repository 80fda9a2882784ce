use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use domain::AppError;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Message envelope: `{"success": ..., "message": ...}`
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Response-side wrapper around the application error taxonomy
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<storage::StorageError> for ApiError {
    fn from(err: storage::StorageError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal detail goes to the logs; the body stays generic.
        match &self.0 {
            AppError::Database(detail) | AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "Request failed");
            }
            other => {
                tracing::debug!(error = %other, "Request rejected");
            }
        }

        (
            status,
            Json(ApiMessage {
                success: false,
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&response.0).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_error_envelope_message() {
        let err = ApiError(AppError::NotFound("Category 42 does not exist".into()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let err = ApiError(AppError::Database("connection reset".into()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
