//! The generator form as a versioned value persisted between invocations.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

pub const DRAFT_VERSION: u32 = 1;

/// Model preselected in a fresh draft.
pub const DEFAULT_DRAFT_MODEL: &str = "google/gemini-3-pro-preview";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("failed to access draft {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("draft {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("draft version {found} is not supported (expected {DRAFT_VERSION})")]
    UnsupportedVersion { found: u32 },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: DraftField, message: String },

    /// A required form field is empty.
    #[error("{0}")]
    Incomplete(&'static str),
}

/// Where the client content comes from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputMode {
    #[default]
    Audio,
    Document,
    Text,
}

/// Editable draft fields, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum DraftField {
    #[strum(serialize = "brand")]
    ClientBrand,
    #[strum(serialize = "url")]
    ProductUrl,
    #[strum(serialize = "mode")]
    InputMode,
    Transcript,
    Attachments,
    PriceList,
    PriceListVersion,
    #[strum(serialize = "prompt")]
    PromptTemplate,
    PromptVersion,
    Model,
    GenerateTwo,
    #[strum(serialize = "markdown")]
    UseMarkdown,
    #[strum(serialize = "user")]
    UserName,
}

/// Form state of the proposal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub version: u32,
    pub client_brand: String,
    pub product_url: String,
    pub input_mode: InputMode,
    /// Pasted client notes, used in `text` mode.
    pub transcript: String,
    /// Recordings or documents, used in `audio` / `document` mode.
    pub attachments: Vec<PathBuf>,
    pub price_list: String,
    pub price_list_version: Option<String>,
    /// Empty means the server's built-in template.
    pub prompt_template: String,
    pub prompt_version: Option<String>,
    pub model: String,
    pub generate_two: bool,
    pub use_markdown: bool,
    pub user_name: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            version: DRAFT_VERSION,
            client_brand: String::new(),
            product_url: String::new(),
            input_mode: InputMode::default(),
            transcript: String::new(),
            attachments: Vec::new(),
            price_list: String::new(),
            price_list_version: None,
            prompt_template: String::new(),
            prompt_version: None,
            model: DEFAULT_DRAFT_MODEL.to_owned(),
            generate_two: false,
            use_markdown: true,
            user_name: None,
        }
    }
}

impl Draft {
    /// Read a draft; a missing file yields the default draft.
    pub fn load(path: &Path) -> Result<Self, DraftError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(DraftError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        let draft: Self = serde_json::from_str(&raw).map_err(|source| DraftError::Parse {
            path: path.to_owned(),
            source,
        })?;
        if draft.version != DRAFT_VERSION {
            return Err(DraftError::UnsupportedVersion {
                found: draft.version,
            });
        }
        Ok(draft)
    }

    /// Write the draft as pretty JSON, replacing the target atomically.
    pub fn save(&self, path: &Path) -> Result<(), DraftError> {
        let io_err = |source| DraftError::Io {
            path: path.to_owned(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| DraftError::Parse {
            path: path.to_owned(),
            source,
        })?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Assign one field from its command-line spelling.
    pub fn set(&mut self, field: DraftField, value: String) -> Result<(), DraftError> {
        let optional = |v: String| (!v.trim().is_empty()).then_some(v);
        match field {
            DraftField::ClientBrand => self.client_brand = value,
            DraftField::ProductUrl => self.product_url = value,
            DraftField::InputMode => {
                self.input_mode = value.parse().map_err(|_| DraftError::InvalidValue {
                    field,
                    message: format!("expected audio, document or text, got {value:?}"),
                })?;
            }
            DraftField::Transcript => self.transcript = value,
            DraftField::Attachments => {
                self.attachments = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(PathBuf::from)
                    .collect();
            }
            DraftField::PriceList => self.price_list = value,
            DraftField::PriceListVersion => self.price_list_version = optional(value),
            DraftField::PromptTemplate => self.prompt_template = value,
            DraftField::PromptVersion => self.prompt_version = optional(value),
            DraftField::Model => self.model = value,
            DraftField::GenerateTwo => self.generate_two = parse_bool(field, &value)?,
            DraftField::UseMarkdown => self.use_markdown = parse_bool(field, &value)?,
            DraftField::UserName => self.user_name = optional(value),
        }
        Ok(())
    }

    /// The checks the generator form runs before submitting.
    pub fn validate_for_generate(&self) -> Result<(), DraftError> {
        if self.client_brand.trim().is_empty() {
            return Err(DraftError::Incomplete("请填写客户品牌名"));
        }
        if self.product_url.trim().is_empty() {
            return Err(DraftError::Incomplete("请填写产品页面URL"));
        }
        match self.input_mode {
            InputMode::Text if self.transcript.trim().is_empty() => {
                return Err(DraftError::Incomplete("请先输入客户需求文本"));
            }
            InputMode::Audio if self.attachments.is_empty() => {
                return Err(DraftError::Incomplete("请先上传录音文件"));
            }
            InputMode::Document if self.attachments.is_empty() => {
                return Err(DraftError::Incomplete("请先上传文档"));
            }
            _ => {}
        }
        if self.price_list.trim().is_empty() {
            return Err(DraftError::Incomplete("请填写公司价目表"));
        }
        Ok(())
    }
}

fn parse_bool(field: DraftField, value: &str) -> Result<bool, DraftError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(DraftError::InvalidValue {
            field,
            message: format!("expected true or false, got {other:?}"),
        }),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
