//! Proposal generation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::post;
use propose_types::{GenerateQuoteRequest, GenerateQuoteResponse, QuoteFailure, QuoteSuccess};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(generate_quote),
    components(schemas(GenerateQuoteRequest, GenerateQuoteResponse, QuoteSuccess, QuoteFailure))
)]
pub struct QuoteApi;

/// Path kept for clients built against the hosted function URL.
pub const LEGACY_PATH: &str = "/functions/v1/generate-quote";

pub fn router(max_body_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-quote", post(generate_quote))
        .route(LEGACY_PATH, post(generate_quote))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Extract text from a transcript, document or recording and generate one
/// or two proposals from it (`POST /generate-quote`).
///
/// `generateCount: 0` returns only the extracted text.
#[utoipa::path(
    post,
    path = "/generate-quote",
    tag = "quote",
    request_body = GenerateQuoteRequest,
    responses(
        (status = 200, description = "Extracted text and generated proposal(s)", body = QuoteSuccess),
        (status = 402, description = "Gateway credit exhausted", body = QuoteFailure),
        (status = 429, description = "Gateway rate limit hit", body = QuoteFailure),
        (status = 500, description = "Invalid input or upstream failure", body = QuoteFailure),
    )
)]
pub async fn generate_quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateQuoteRequest>, JsonRejection>,
) -> Result<Json<GenerateQuoteResponse>, ServerError> {
    let Json(request) = payload?;
    info!(
        has_transcript = request.transcript.is_some(),
        has_document = request.document_base64.is_some(),
        has_audio = request.audio_base64.is_some(),
        generate_count = request.generate_count,
        model = request.model.as_deref().unwrap_or("<default>"),
        "generate-quote request"
    );

    let result = state.pipeline.process(request).await?;
    Ok(Json(result.into()))
}
