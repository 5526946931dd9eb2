use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// Browser clients call the endpoint cross-origin, so every route answers
/// `OPTIONS` preflight and carries CORS headers on every response.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        // Wildcard; set PROPOSE_CORS_ORIGINS to restrict.
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
