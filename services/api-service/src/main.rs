use common::telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig};
use common::AppConfig;
use std::net::SocketAddr;
use std::time::Duration;

mod auth;
mod handlers;
mod middleware;
mod responses;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    let enable_jaeger = std::env::var("ENABLE_JAEGER")
        .unwrap_or_else(|_| "false".to_string())
        .parse()
        .unwrap_or(false);

    let telemetry_config = TelemetryConfig {
        service_name: "bakery-api".to_string(),
        log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        jaeger_endpoint: std::env::var("JAEGER_ENDPOINT").ok(),
        enable_jaeger,
    };

    init_telemetry(telemetry_config)?;

    // Missing DATABASE_URL or JWT_SECRET aborts startup here.
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    tracing::info!("Starting bakery API service...");

    // Initialize application state
    let state = state::AppState::new(&config).await?;

    // Periodic sweep for the rate limiter and the in-process cache
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweep_state.rate_limiter.prune_expired();
            if let Some(cache) = &sweep_state.memory_cache {
                cache.prune_expired();
            }
        }
    });

    // Build router
    let app = routes::create_router(state, &config);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Bakery API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        e
    })?;

    // Shutdown telemetry gracefully
    shutdown_telemetry();

    Ok(())
}
