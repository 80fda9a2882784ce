use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use common::{metrics, AppConfig};

use crate::auth;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    match metrics::gather_metrics() {
        Ok(metrics) => (StatusCode::OK, metrics),
        Err(e) => {
            tracing::error!("Failed to gather metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Failed to gather metrics"),
            )
        }
    }
}

pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    // Public: catalog reads, auth, service plumbing
    let public = Router::new()
        .route("/", get(handlers::meta::root))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/categories", get(handlers::categories::list))
        .route("/api/v1/categories/:id", get(handlers::categories::get))
        .route("/api/v1/ingredients", get(handlers::ingredients::list))
        .route("/api/v1/ingredients/:id", get(handlers::ingredients::get))
        .route("/api/v1/order-statuses", get(handlers::order_statuses::list))
        .route(
            "/api/v1/order-statuses/:id",
            get(handlers::order_statuses::get),
        )
        .route("/api/v1/products", get(handlers::products::list))
        .route("/api/v1/products/:id", get(handlers::products::get));

    // Any authenticated user: order creation and own-order reads
    let authenticated = Router::new()
        .route(
            "/api/v1/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route("/api/v1/orders/:id", get(handlers::orders::get))
        .route("/api/v1/orders/:id/items", get(handlers::orders::list_items))
        .route_layer(from_fn_with_state(state.clone(), auth::require_auth));

    // Admin only: catalog and status mutations, order administration, users
    let admin = Router::new()
        .route("/api/v1/categories", post(handlers::categories::create))
        .route(
            "/api/v1/categories/:id",
            put(handlers::categories::update).delete(handlers::categories::delete),
        )
        .route("/api/v1/ingredients", post(handlers::ingredients::create))
        .route(
            "/api/v1/ingredients/:id",
            put(handlers::ingredients::update).delete(handlers::ingredients::delete),
        )
        .route(
            "/api/v1/order-statuses",
            post(handlers::order_statuses::create),
        )
        .route(
            "/api/v1/order-statuses/:id",
            put(handlers::order_statuses::update).delete(handlers::order_statuses::delete),
        )
        .route("/api/v1/products", post(handlers::products::create))
        .route(
            "/api/v1/products/:id",
            put(handlers::products::update).delete(handlers::products::delete),
        )
        .route(
            "/api/v1/orders/:id",
            put(handlers::orders::update).delete(handlers::orders::delete),
        )
        .route("/api/v1/orders/:id/complete", post(handlers::orders::complete))
        .route(
            "/api/v1/orders/status/:status_id",
            get(handlers::orders::list_by_status),
        )
        .route(
            "/api/v1/order-items/:id",
            get(handlers::order_items::get)
                .put(handlers::order_items::update)
                .delete(handlers::order_items::delete),
        )
        .route(
            "/api/v1/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/v1/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        // Runs after routing so the matched route template is available.
        .route_layer(from_fn(middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        // Outermost: over-limit requests are rejected before any other work.
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .with_state(state)
}
