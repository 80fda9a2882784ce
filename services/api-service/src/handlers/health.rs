use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: bool,
    pub cache: bool,
}

/// Health check endpoint.
///
/// A dead cache does not fail the check; reads fall back to the database.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let cache = state.cache.is_available().await;

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "healthy" } else { "unhealthy" }.to_string(),
            service: "bakery-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            cache,
        }),
    )
}
