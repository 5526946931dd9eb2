use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use http_body_util::BodyExt;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::state::AppState;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Failure envelopes up to this size are echoed into the log.
const MAX_LOGGED_BODY: usize = 1024;

/// Wrap each request in an `http_request` span keyed by an `x-trace-id`.
///
/// A valid incoming id is reused, otherwise a v4 uuid is minted; either way
/// it is forwarded to the handler and echoed on the response. Request bodies
/// are only measured, never logged.
pub async fn trace_middleware(
    State(_state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let header_value = HeaderValue::try_from(trace_id.to_string()).ok();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!(
            content_type = content_type(req.headers()),
            content_length = content_length(req.headers()),
            "→ request started"
        );
        if let Some(value) = &header_value {
            req.headers_mut().insert(X_TRACE_ID, value.clone());
        }

        let response = next.run(req).await;
        let status = response.status();

        let mut response = if is_loggable_failure(status, response.headers()) {
            let (parts, body) = response.into_parts();
            let bytes = buffer_and_log(body).await;
            Response::from_parts(parts, Body::from(bytes))
        } else {
            response
        };

        if let Some(value) = header_value {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        info!(
            status = status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Small JSON error responses are worth a log line; everything else streams
/// through untouched.
fn is_loggable_failure(status: StatusCode, headers: &HeaderMap) -> bool {
    (status.is_client_error() || status.is_server_error())
        && content_type(headers).contains("application/json")
        && content_length(headers) < MAX_LOGGED_BODY as u64
}

async fn buffer_and_log(body: Body) -> Bytes {
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to buffer response body");
            return Bytes::new();
        }
    };

    if bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            warn!(body = %text, "failure response");
        }
    }
    bytes
}
