use propose_types::ErrorCode;
use strum::Display;
use thiserror::Error;

/// The upstream call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    /// Speech-to-text over an audio payload.
    #[strum(to_string = "Transcription")]
    Transcription,
    /// Text extraction over a document payload.
    #[strum(to_string = "Document extraction")]
    DocumentExtraction,
    /// Proposal generation.
    #[strum(to_string = "Quote generation")]
    Generation,
}

/// Every way a proposal request can fail.
///
/// Each variant is terminal for the request; nothing is retried here.
#[derive(Debug, Error)]
pub enum ProposalError {
    /// Missing content source, missing price list, or an undecodable payload.
    /// No upstream call has been made.
    #[error("{0}")]
    InvalidInput(String),

    /// Generation answered 429.
    #[error("请求过于频繁，请稍后再试")]
    RateLimited,

    /// Generation answered 402.
    #[error("AI 服务额度已用尽，请联系管理员")]
    QuotaExhausted,

    /// Any other non-2xx answer.
    #[error("{stage} API error ({status}): {body}")]
    Upstream { stage: Stage, status: u16, body: String },

    /// 2xx with an empty body.
    #[error("{stage} API returned an empty response, please retry")]
    EmptyUpstreamResponse { stage: Stage },

    /// 2xx with a body that is not a chat completion.
    #[error("{stage} API returned a malformed response: {detail}")]
    MalformedUpstreamResponse { stage: Stage, detail: String },

    /// The request never produced an HTTP response.
    #[error("{stage} request failed: {message}")]
    Transport { stage: Stage, message: String },
}

impl ProposalError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Stable category reported to callers next to the message.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::RateLimited => ErrorCode::RateLimited,
            Self::QuotaExhausted => ErrorCode::QuotaExhausted,
            Self::Upstream { .. } => ErrorCode::UpstreamError,
            Self::EmptyUpstreamResponse { .. } => ErrorCode::EmptyResponse,
            Self::MalformedUpstreamResponse { .. } => ErrorCode::MalformedResponse,
            Self::Transport { .. } => ErrorCode::Transport,
        }
    }

    /// HTTP status the endpoint answers with: 429 and 402 pass through,
    /// everything else is a 500.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::QuotaExhausted => 402,
            _ => 500,
        }
    }

    /// The stage this error came from, if an upstream call was involved.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Upstream { stage, .. }
            | Self::EmptyUpstreamResponse { stage }
            | Self::MalformedUpstreamResponse { stage, .. }
            | Self::Transport { stage, .. } => Some(*stage),
            Self::RateLimited | Self::QuotaExhausted => Some(Stage::Generation),
            Self::InvalidInput(_) => None,
        }
    }
}
