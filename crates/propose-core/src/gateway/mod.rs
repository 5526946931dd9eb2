//! The LLM gateway port and the reply parsing shared by every adapter.
//!
//! Adapters hand back the raw status and body text; [`UpstreamReply::into_content`]
//! turns that into generated text or a classified [`ProposalError`]. Reading
//! the body as text first lets an empty 200 be told apart from a garbled one.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use propose_types::{ChatCompletionRequest, ChatCompletionResponse};

use crate::error::{ProposalError, Stage};

/// Raw upstream answer: HTTP status plus the unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Classify the reply and extract the first choice's content.
    ///
    /// 429 and 402 get dedicated errors only for generation; extraction
    /// failures always surface as [`ProposalError::Upstream`].
    pub fn into_content(self, stage: Stage) -> Result<String, ProposalError> {
        if !self.is_success() {
            return Err(match (stage, self.status) {
                (Stage::Generation, 429) => ProposalError::RateLimited,
                (Stage::Generation, 402) => ProposalError::QuotaExhausted,
                (_, status) => ProposalError::Upstream {
                    stage,
                    status,
                    body: self.body,
                },
            });
        }

        if self.body.trim().is_empty() {
            return Err(ProposalError::EmptyUpstreamResponse { stage });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&self.body).map_err(|e| {
            ProposalError::MalformedUpstreamResponse {
                stage,
                detail: e.to_string(),
            }
        })?;
        Ok(parsed.first_content().to_owned())
    }
}

/// A chat-completion service the pipeline delegates to.
///
/// Implementations must not retry; every call is a single best-effort
/// attempt.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send one completion request and return the raw reply.
    ///
    /// Only failures that produce no HTTP response at all are errors here;
    /// non-2xx statuses come back as an [`UpstreamReply`].
    async fn send(
        &self,
        stage: Stage,
        request: &ChatCompletionRequest,
    ) -> Result<UpstreamReply, ProposalError>;
}
