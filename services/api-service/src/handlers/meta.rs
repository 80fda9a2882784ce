use axum::Json;

use crate::responses::ApiResponse;

/// Root endpoint returning service metadata
pub async fn root() -> Json<ApiResponse<serde_json::Value>> {
    ApiResponse::ok(serde_json::json!({
        "name": "bakery-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Bakery management backend",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_reports_service_name() {
        let response = root().await;
        let json = serde_json::to_value(&response.0).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "bakery-api");
    }
}
