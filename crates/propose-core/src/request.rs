//! Validated domain form of a `generate-quote` call and its result.

use propose_types::{GenerateQuoteRequest, GenerateQuoteResponse};

use crate::content::ContentSource;
use crate::error::ProposalError;

/// How many proposals to generate after extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VariantCount {
    /// Return the extracted text only; generation is skipped.
    ExtractOnly,
    #[default]
    Single,
    /// Two independent variants generated concurrently.
    Dual,
}

impl VariantCount {
    /// `0` selects extraction only, `2` and above clamp to two variants,
    /// everything else (including negatives) means one.
    pub fn from_count(count: i64) -> Self {
        match count {
            0 => Self::ExtractOnly,
            n if n >= 2 => Self::Dual,
            _ => Self::Single,
        }
    }
}

/// Formatting instructions appended to the generation prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    PlainText,
}

impl OutputFormat {
    pub fn from_markdown_flag(use_markdown: bool) -> Self {
        if use_markdown { Self::Markdown } else { Self::PlainText }
    }
}

/// Optional client details woven into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub brand: Option<String>,
    pub product_url: Option<String>,
}

impl ClientInfo {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none() && self.product_url.is_none()
    }
}

/// One proposal request, validated.
///
/// `price_list` and `prompt_template` are read-only inputs; nothing in the
/// pipeline rewrites them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source: ContentSource,
    pub price_list: String,
    /// Replaces the built-in proposal template when present.
    pub prompt_template: Option<String>,
    /// Upstream model; the pipeline default applies when absent.
    pub model: Option<String>,
    pub variants: VariantCount,
    pub client: ClientInfo,
    pub output_format: OutputFormat,
}

impl TryFrom<GenerateQuoteRequest> for GenerationRequest {
    type Error = ProposalError;

    fn try_from(req: GenerateQuoteRequest) -> Result<Self, Self::Error> {
        let source = ContentSource::select(
            req.transcript.as_deref(),
            req.document_base64.as_deref(),
            req.document_type.as_deref(),
            req.audio_base64.as_deref(),
            req.mime_type.as_deref(),
        )?;

        let price_list = present(req.price_list)
            .ok_or_else(|| ProposalError::invalid_input("No price list provided"))?;

        Ok(Self {
            source,
            price_list,
            prompt_template: present(req.custom_prompt),
            model: present(req.model),
            variants: req
                .generate_count
                .map(VariantCount::from_count)
                .unwrap_or_default(),
            client: ClientInfo {
                brand: present(req.client_brand).map(|s| s.trim().to_owned()),
                product_url: present(req.product_url).map(|s| s.trim().to_owned()),
            },
            output_format: OutputFormat::from_markdown_flag(req.use_markdown.unwrap_or(true)),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Always populated, even in extraction-only mode.
    pub extracted_text: String,
    /// `None` only in extraction-only mode.
    pub primary: Option<String>,
    /// `Some` only when two variants were requested.
    pub secondary: Option<String>,
}

impl GenerationResult {
    pub fn extraction_only(extracted_text: String) -> Self {
        Self {
            extracted_text,
            primary: None,
            secondary: None,
        }
    }
}

impl From<GenerationResult> for GenerateQuoteResponse {
    fn from(result: GenerationResult) -> Self {
        GenerateQuoteResponse::success(result.extracted_text, result.primary, result.secondary)
    }
}
