use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    // HTTP metrics
    pub static ref HTTP_REQUEST_COUNTER: CounterVec = register_counter_vec!(
        "bakery_http_requests_total",
        "Total number of HTTP requests handled",
        &["method", "path", "status"]
    )
    .expect("metric cannot be created");

    pub static ref HTTP_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "bakery_http_request_duration_seconds",
        "HTTP request handling duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("metric cannot be created");

    // Cache metrics
    pub static ref CACHE_REQUEST_COUNTER: CounterVec = register_counter_vec!(
        "bakery_cache_requests_total",
        "Total number of cache lookups",
        &["entity", "status"]
    )
    .expect("metric cannot be created");

    // Database metrics
    pub static ref DB_OPERATION_COUNTER: CounterVec = register_counter_vec!(
        "bakery_db_operations_total",
        "Total number of database operations",
        &["operation", "status"]
    )
    .expect("metric cannot be created");

    pub static ref DB_OPERATION_DURATION: HistogramVec = register_histogram_vec!(
        "bakery_db_operation_duration_seconds",
        "Database operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("metric cannot be created");

    // Order metrics
    pub static ref ORDER_CREATED_COUNTER: CounterVec = register_counter_vec!(
        "bakery_orders_created_total",
        "Total number of order creation attempts",
        &["status"]
    )
    .expect("metric cannot be created");

    // Rate limiting metrics
    pub static ref RATE_LIMITED_COUNTER: CounterVec = register_counter_vec!(
        "bakery_rate_limited_total",
        "Total number of requests denied by the rate limiter",
        &["scope"]
    )
    .expect("metric cannot be created");
}

/// Get all metrics in Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Helper function to record a handled HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUEST_COUNTER
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper function to record cache hit/miss
pub fn record_cache_request(entity: &str, hit: bool) {
    let status = if hit { "hit" } else { "miss" };
    CACHE_REQUEST_COUNTER
        .with_label_values(&[entity, status])
        .inc();
}

/// Helper function to record a database operation
pub fn record_db_operation(operation: &str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "error" };
    DB_OPERATION_COUNTER
        .with_label_values(&[operation, status])
        .inc();
    DB_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}

/// Helper function to record an order creation attempt
pub fn record_order_created(success: bool) {
    let status = if success { "success" } else { "rejected" };
    ORDER_CREATED_COUNTER.with_label_values(&[status]).inc();
}

/// Helper function to record a rate-limited request
pub fn record_rate_limited(scope: &str) {
    RATE_LIMITED_COUNTER.with_label_values(&[scope]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_metrics() {
        let result = gather_metrics();
        assert!(result.is_ok());
        let metrics = result.unwrap();
        assert!(metrics.contains("bakery_"));
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/v1/products", 200, 0.05);
        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("bakery_http_requests_total"));
    }

    #[test]
    fn test_record_cache_request() {
        record_cache_request("product", true);
        record_cache_request("product", false);
        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("bakery_cache_requests_total"));
    }

    #[test]
    fn test_record_db_operation() {
        record_db_operation("product.find_by_id", true, 0.01);
        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("bakery_db_operations_total"));
    }
}
