use async_trait::async_trait;
use propose_types::ChatCompletionRequest;
use reqwest::Client;
use tracing::{debug, warn};

use super::{ChatGateway, UpstreamReply};
use crate::error::{ProposalError, Stage};

/// [`ChatGateway`] over HTTP: bearer-authenticated JSON POSTs to an
/// OpenAI-compatible `chat/completions` URL.
#[derive(Clone)]
pub struct HttpGateway {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!("propose-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn send(
        &self,
        stage: Stage,
        request: &ChatCompletionRequest,
    ) -> Result<UpstreamReply, ProposalError> {
        let transport = |e: reqwest::Error| ProposalError::Transport {
            stage,
            message: e.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        if (200..300).contains(&status) {
            debug!(%stage, status, body_len = body.len(), "upstream replied");
        } else {
            warn!(%stage, status, body = %body, "upstream returned an error status");
        }

        Ok(UpstreamReply { status, body })
    }
}
