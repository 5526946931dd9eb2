//! Catalog of upstream models offered to proposal writers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Model used when a request names none.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Model used for audio / document extraction; it must accept inline audio.
pub const DEFAULT_EXTRACTION_MODEL: &str = "google/gemini-2.5-flash";

// (id, display name, provider, description)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    (
        "google/gemini-3-pro-preview",
        "Gemini 3.0 Pro",
        "Google",
        "最新一代 Pro 模型，推理能力最强",
    ),
    (
        "google/gemini-3-flash-preview",
        "Gemini 3.0 Flash",
        "Google",
        "最新一代 Flash 模型，速度与能力平衡",
    ),
    (
        "google/gemini-2.5-pro",
        "Gemini 2.5 Pro",
        "Google",
        "顶级多模态模型，复杂推理能力强",
    ),
    (
        "google/gemini-2.5-flash",
        "Gemini 2.5 Flash",
        "Google",
        "快速响应，性价比高",
    ),
    ("openai/gpt-5.2", "GPT-5.2", "OpenAI", "最新旗舰模型，推理能力最强"),
    ("openai/gpt-5", "GPT-5", "OpenAI", "强大通用模型，准确性和细腻度佳"),
    (
        "openai/gpt-5-mini",
        "GPT-5 Mini",
        "OpenAI",
        "高性价比版本，保持强推理能力",
    ),
];

/// A single selectable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    /// Identifier passed upstream as `model`.
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
}

/// Response body for `GET /models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ModelListResponse {
    /// Always `"list"`.
    pub object: String,
    /// Model the server falls back to when a request names none.
    pub default_model: String,
    pub data: Vec<ModelInfo>,
}

/// All catalog entries, in display order.
pub fn catalog() -> Vec<ModelInfo> {
    CATALOG
        .iter()
        .map(|(id, name, provider, description)| ModelInfo {
            id: (*id).to_owned(),
            name: (*name).to_owned(),
            provider: (*provider).to_owned(),
            description: (*description).to_owned(),
        })
        .collect()
}

/// Whether `id` is one of the catalog entries.
pub fn is_known_model(id: &str) -> bool {
    CATALOG.iter().any(|(known, ..)| *known == id)
}
