//! Request / response bodies of the `generate-quote` endpoint.
//!
//! Field names follow the camelCase JSON the browser form has always sent,
//! so existing clients keep working without modification.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

// ── Inbound ──────────────────────────────────────────────────────────────────

/// Request body for `POST /generate-quote`.
///
/// Every field is optional on the wire; which combination is acceptable is
/// decided by the domain layer, not by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuoteRequest {
    /// Base64-encoded audio recording of the sales call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    /// MIME type of `audioBase64` (default `audio/webm`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded document (PDF, Word, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_base64: Option<String>,
    /// MIME type of `documentBase64` (default `application/pdf`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    /// Pasted or pre-extracted text; takes precedence over any payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Company price list. Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_list: Option<String>,
    /// Proposal template replacing the built-in default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    /// Upstream model identifier, e.g. `google/gemini-2.5-flash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `0` = extraction only, `1` (default) or `2` proposal variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_count: Option<i64>,
    /// Client brand name, substituted into the proposal title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_brand: Option<String>,
    /// Product page URL of the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    /// Markdown (default) or plain-text output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_markdown: Option<bool>,
}

// ── Outbound ─────────────────────────────────────────────────────────────────

/// Machine-readable failure category sent next to the human-readable reason.
///
/// Callers branch on this value; the `error` text is for display only.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    /// No content source, empty price list, or an unreadable request body.
    InvalidInput,
    /// Upstream answered 429.
    RateLimited,
    /// Upstream answered 402.
    QuotaExhausted,
    /// Any other non-2xx answer from upstream.
    UpstreamError,
    /// Upstream answered 2xx with an empty body.
    EmptyResponse,
    /// Upstream answered 2xx with a body that is not a chat completion.
    MalformedResponse,
    /// The upstream request never produced a response.
    Transport,
    #[default]
    Internal,
}

/// Successful generation (or extraction-only) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuoteSuccess {
    /// Extracted / transcribed text the proposal was built from.
    pub transcription: String,
    /// First proposal; absent in extraction-only mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    /// Second proposal variant; present only when two were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote2: Option<String>,
    /// Always `true`.
    pub success: bool,
}

/// Failure envelope; no partial output is ever attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuoteFailure {
    /// Human-readable reason.
    pub error: String,
    /// Stable failure category.
    #[serde(default)]
    pub code: ErrorCode,
    /// Always `false`.
    pub success: bool,
}

/// Response body for `POST /generate-quote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum GenerateQuoteResponse {
    Success(QuoteSuccess),
    Failure(QuoteFailure),
}

impl GenerateQuoteResponse {
    pub fn success(transcription: String, quote: Option<String>, quote2: Option<String>) -> Self {
        Self::Success(QuoteSuccess {
            transcription,
            quote,
            quote2,
            success: true,
        })
    }

    pub fn failure(error: impl Into<String>, code: ErrorCode) -> Self {
        Self::Failure(QuoteFailure {
            error: error.into(),
            code,
            success: false,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
