//! HTTP client for propose-server.

use propose_types::{
    ErrorCode, GenerateQuoteRequest, GenerateQuoteResponse, ModelListResponse, QuoteSuccess,
};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with its failure envelope.
    #[error("{message}")]
    Service { code: ErrorCode, message: String },

    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

impl ClientError {
    /// Text shown to the user; quota problems get fixed wording.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Service {
                code: ErrorCode::RateLimited,
                ..
            } => "请求过于频繁，请稍后再试".to_owned(),
            ClientError::Service {
                code: ErrorCode::QuotaExhausted,
                ..
            } => "AI 服务额度已用尽".to_owned(),
            ClientError::Service { message, .. } if message.trim().is_empty() => {
                "生成失败，请重试".to_owned()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProposeClient {
    base_url: String,
    http: Client,
}

impl ProposeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(concat!("propose-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        }
    }

    pub async fn generate_quote(
        &self,
        request: &GenerateQuoteRequest,
    ) -> Result<QuoteSuccess, ClientError> {
        let url = format!("{}/generate-quote", self.base_url);
        let http_err = |source| ClientError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(http_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(http_err)?;
        debug!(status, body_len = body.len(), "generate-quote answered");

        interpret(status, &body)
    }

    pub async fn list_models(&self) -> Result<ModelListResponse, ClientError> {
        let url = format!("{}/models", self.base_url);
        let http_err = |source| ClientError::Http {
            url: url.clone(),
            source,
        };

        let response = self.http.get(&url).send().await.map_err(http_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(http_err)?;
        serde_json::from_str(&body).map_err(|_| ClientError::UnexpectedResponse { status, body })
    }
}

/// Map a `generate-quote` answer onto success or a structured failure.
fn interpret(status: u16, body: &str) -> Result<QuoteSuccess, ClientError> {
    match serde_json::from_str::<GenerateQuoteResponse>(body) {
        Ok(GenerateQuoteResponse::Success(success)) if success.success => Ok(success),
        Ok(GenerateQuoteResponse::Failure(failure)) => Err(ClientError::Service {
            code: failure.code,
            message: failure.error,
        }),
        _ => Err(ClientError::UnexpectedResponse {
            status,
            body: body.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_is_returned() {
        let ok = interpret(
            200,
            r#"{"transcription":"t","quote":"q","quote2":"q2","success":true}"#,
        )
        .unwrap();
        assert_eq!(ok.quote.as_deref(), Some("q"));
        assert_eq!(ok.quote2.as_deref(), Some("q2"));
    }

    #[test]
    fn failure_envelope_keeps_code() {
        let err = interpret(
            429,
            r#"{"error":"请求过于频繁，请稍后再试","code":"rate_limited","success":false}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Service {
                code: ErrorCode::RateLimited,
                ..
            }
        ));
    }

    #[test]
    fn messages_follow_the_code_not_the_text() {
        let quota = ClientError::Service {
            code: ErrorCode::QuotaExhausted,
            message: "Quote generation API error (402)".into(),
        };
        assert_eq!(quota.user_message(), "AI 服务额度已用尽");

        let upstream = ClientError::Service {
            code: ErrorCode::UpstreamError,
            message: "额度 mentioned but irrelevant".into(),
        };
        assert_eq!(upstream.user_message(), "额度 mentioned but irrelevant");
    }

    #[test]
    fn non_envelope_bodies_are_unexpected() {
        let err = interpret(502, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse { status: 502, .. }));
    }
}
