//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for propose-server.
///
/// Everything except the gateway API key has a default; `main` refuses to
/// start without the key.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// OpenAI-compatible chat-completions URL.
    pub gateway_url: String,

    /// Bearer token for the gateway.
    pub gateway_api_key: Option<String>,

    /// Generation model used when a request names none.
    pub default_model: String,

    /// Model used for audio transcription and document extraction.
    pub extraction_model: String,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui`.
    pub enable_swagger: bool,

    /// Maximum accepted request body in bytes. Audio arrives base64-inlined.
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("gateway_url", &self.gateway_url)
            .field("gateway_api_key", &self.gateway_api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("extraction_model", &self.extraction_model)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("enable_swagger", &self.enable_swagger)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            gateway_url: DEFAULT_GATEWAY_URL.to_owned(),
            gateway_api_key: None,
            default_model: propose_types::DEFAULT_MODEL.to_owned(),
            extraction_model: propose_types::DEFAULT_EXTRACTION_MODEL.to_owned(),
            cors_allowed_origins: None,
            enable_swagger: true,
            max_body_bytes: DEFAULT_MAX_BODY_MB * 1024 * 1024,
        }
    }
}

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_MAX_BODY_MB: usize = 64;

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("PROPOSE_BIND", &defaults.bind_address),
            log_level: env_or("PROPOSE_LOG", &defaults.log_level),
            log_json: flag_env("PROPOSE_LOG_JSON", defaults.log_json),
            gateway_url: env_or("PROPOSE_GATEWAY_URL", &defaults.gateway_url),
            gateway_api_key: non_empty_env("PROPOSE_GATEWAY_API_KEY"),
            default_model: env_or("PROPOSE_DEFAULT_MODEL", &defaults.default_model),
            extraction_model: env_or("PROPOSE_EXTRACTION_MODEL", &defaults.extraction_model),
            cors_allowed_origins: non_empty_env("PROPOSE_CORS_ORIGINS"),
            enable_swagger: flag_env("PROPOSE_ENABLE_SWAGGER", defaults.enable_swagger),
            max_body_bytes: parse_env("PROPOSE_MAX_BODY_MB", DEFAULT_MAX_BODY_MB)
                .saturating_mul(1024 * 1024),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v).unwrap_or(default))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" => Some(true),
        "0" => Some(false),
        v if v.eq_ignore_ascii_case("true") => Some(true),
        v if v.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
