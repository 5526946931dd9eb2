//! extract → generate (×1 or ×2) → join.
//!
//! The pipeline owns no state beyond its gateway handle and options, so one
//! instance serves every request concurrently.

use std::sync::Arc;

use propose_types::{
    ChatCompletionRequest, DEFAULT_EXTRACTION_MODEL, DEFAULT_MODEL, GenerateQuoteRequest,
};
use tracing::{Instrument, info, info_span};

use crate::content::ContentSource;
use crate::error::{ProposalError, Stage};
use crate::gateway::ChatGateway;
use crate::prompt::{self, Variant};
use crate::request::{GenerationRequest, GenerationResult, VariantCount};

/// Model choices applied when a request leaves them open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Generation model when the request names none.
    pub default_model: String,
    /// Model for audio / document extraction; must accept inline audio.
    pub extraction_model: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_owned(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_owned(),
        }
    }
}

/// Runs one proposal request against a [`ChatGateway`].
#[derive(Clone)]
pub struct ProposalPipeline {
    gateway: Arc<dyn ChatGateway>,
    options: PipelineOptions,
}

impl std::fmt::Debug for ProposalPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalPipeline")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ProposalPipeline {
    pub fn new(gateway: Arc<dyn ChatGateway>, options: PipelineOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Validate a wire request and run it.
    ///
    /// Validation failures return before any upstream call is made.
    pub async fn process(&self, request: GenerateQuoteRequest) -> Result<GenerationResult, ProposalError> {
        let request = GenerationRequest::try_from(request)?;
        self.run(&request).await
    }

    /// Run a validated request end to end.
    ///
    /// With two variants both generation calls are started together and both
    /// are awaited to completion; if either fails the whole run fails, the
    /// primary's error taking precedence.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, ProposalError> {
        let extracted_text = self.extract(&request.source).await?;

        let (primary, secondary) = match request.variants {
            VariantCount::ExtractOnly => {
                info!(text_len = extracted_text.len(), "extraction-only request finished");
                return Ok(GenerationResult::extraction_only(extracted_text));
            }
            VariantCount::Single => {
                let primary = self.generate(request, &extracted_text, Variant::Primary).await?;
                (primary, None)
            }
            VariantCount::Dual => {
                let (primary, secondary) = tokio::join!(
                    self.generate(request, &extracted_text, Variant::Primary),
                    self.generate(request, &extracted_text, Variant::Secondary),
                );
                (primary?, Some(secondary?))
            }
        };

        Ok(GenerationResult {
            extracted_text,
            primary: Some(primary),
            secondary,
        })
    }

    /// Turn the content source into text; inline text costs no call.
    async fn extract(&self, source: &ContentSource) -> Result<String, ProposalError> {
        let stage = match source {
            ContentSource::InlineText(text) => {
                info!(text_len = text.len(), "using provided transcript");
                return Ok(text.clone());
            }
            ContentSource::Document { .. } => Stage::DocumentExtraction,
            ContentSource::Audio { .. } => Stage::Transcription,
        };

        let Some(messages) = prompt::extraction_messages(source) else {
            return Err(ProposalError::invalid_input("content source has no payload"));
        };
        let request = ChatCompletionRequest {
            model: self.options.extraction_model.clone(),
            messages,
        };

        let span = info_span!("extract", %stage, source = source.kind(), model = %request.model);
        async move {
            info!("extraction started");
            let text = self.gateway.send(stage, &request).await?.into_content(stage)?;
            info!(text_len = text.len(), "extraction complete");
            Ok::<_, ProposalError>(text)
        }
        .instrument(span)
        .await
    }

    /// Generate one proposal variant from the extracted text.
    async fn generate(
        &self,
        request: &GenerationRequest,
        extracted_text: &str,
        variant: Variant,
    ) -> Result<String, ProposalError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.options.default_model.clone());
        let completion = ChatCompletionRequest {
            model,
            messages: prompt::generation_messages(request, extracted_text, variant),
        };

        let span = info_span!("generate", %variant, model = %completion.model);
        async move {
            info!("generating proposal");
            let text = self
                .gateway
                .send(Stage::Generation, &completion)
                .await?
                .into_content(Stage::Generation)?;
            info!(output_len = text.len(), "proposal generated");
            Ok::<_, ProposalError>(text)
        }
        .instrument(span)
        .await
    }
}
