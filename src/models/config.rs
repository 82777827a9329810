use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml, with environment
/// overrides applied on top
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// HTTP listener settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:3001"
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "https://localhost:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Upstream language-model API settings
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key; normally supplied through OPENAI_API_KEY instead
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

/// Raster export limits
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Largest accepted PNG scale factor
    #[serde(default = "default_max_scale")]
    pub max_scale: f32,
}

fn default_max_scale() -> f32 {
    8.0
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_scale: default_max_scale(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file. A missing or unparsable file is
    /// logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from CONFIG_FILE (if set) and apply environment overrides.
    pub fn from_env() -> Self {
        let config_file = std::env::var("CONFIG_FILE").ok();
        Self::load(config_file.as_deref().map(Path::new))
            .with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup:
    /// `BIND_ADDR` (or `PORT`), `OPENAI_API_KEY`, `LLM_BASE_URL`, `LLM_MODEL`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            self.server.bind_addr = format!("0.0.0.0:{port}");
        }
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        self
    }
}
