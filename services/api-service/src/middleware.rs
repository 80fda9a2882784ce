use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

use domain::AppError;

use crate::auth::Claims;
use crate::responses::ApiError;
use crate::state::AppState;

/// Deny requests over the windowed limit with a 429 envelope.
///
/// Keys prefer the authenticated subject when a gate has already run;
/// otherwise the forwarded client address is used.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&request);
    let decision = state.rate_limiter.check(&key);

    if !decision.allowed {
        common::metrics::record_rate_limited("api");
        return Err(AppError::RateLimited.into());
    }

    Ok(next.run(request).await)
}

fn client_key(request: &Request) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return format!("user:{}", claims.sub);
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| format!("ip:{}", ip.trim()))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

/// Record request count and duration per matched route
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    // The matched route template keeps metric cardinality bounded.
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    common::metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
