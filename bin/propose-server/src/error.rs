//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`; the [`IntoResponse`] impl turns
//! every failure into the `{ error, code, success: false }` envelope with the
//! status the pipeline assigned (429, 402 or 500).

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use propose_core::ProposalError;
use propose_types::{ErrorCode, GenerateQuoteResponse};
use thiserror::Error;
use tracing::{error, warn};

/// All errors that can occur in the propose-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the proposal pipeline.
    #[error(transparent)]
    Proposal(#[from] ProposalError),

    /// The body could not be read as a `GenerateQuoteRequest`.
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl ServerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServerError::Proposal(e) => e.code(),
            ServerError::InvalidBody(_) => ErrorCode::InvalidInput,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Proposal(e) => {
                StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            // Every non-quota failure shares 500; `code` tells them apart.
            ServerError::InvalidBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match &self {
            ServerError::Proposal(ProposalError::InvalidInput(message)) => {
                warn!(%code, %message, "rejected proposal request");
            }
            ServerError::Proposal(e) => {
                error!(%code, stage = ?e.stage(), error = %e, "proposal pipeline failed");
            }
            ServerError::InvalidBody(e) => {
                warn!(%code, error = %e.body_text(), "unreadable request body");
            }
        }

        let body = GenerateQuoteResponse::failure(self.to_string(), code);
        (status, Json(body)).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
