//! propose-core – turns a sales-call artifact and a price list into one or
//! two proposal documents by way of an external chat-completion gateway.
//!
//! ```text
//! GenerateQuoteRequest ──► GenerationRequest ──► extract ──► generate ─┐
//!                                                         └─► generate ─┴► GenerationResult
//! ```

mod content;
mod error;
mod pipeline;
mod request;

pub mod gateway;
pub mod prompt;

#[cfg(test)]
mod tests;

pub use content::{ContentSource, DEFAULT_AUDIO_MIME, DEFAULT_DOCUMENT_MIME};
pub use error::{ProposalError, Stage};
pub use gateway::{ChatGateway, HttpGateway, UpstreamReply};
pub use pipeline::{PipelineOptions, ProposalPipeline};
pub use request::{ClientInfo, GenerationRequest, GenerationResult, OutputFormat, VariantCount};
