//! Shared wire types for propose.
//!
//! - [`quote`]: the browser-facing `generate-quote` request and response.
//! - [`chat`]: the OpenAI-compatible payloads exchanged with the LLM gateway.
//! - [`models`]: the catalog of selectable upstream models.

pub mod chat;
pub mod models;
pub mod quote;

pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use models::{DEFAULT_EXTRACTION_MODEL, DEFAULT_MODEL, ModelInfo, ModelListResponse};
pub use quote::{ErrorCode, GenerateQuoteRequest, GenerateQuoteResponse, QuoteFailure, QuoteSuccess};
