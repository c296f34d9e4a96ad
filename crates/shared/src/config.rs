//! Application configuration management.
//!
//! Sources are layered: `config/default.toml`, `config/{RUN_MODE}.toml`, then
//! `TRIPWISE__SECTION__KEY` environment variables.

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TRIPWISE";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Itinerary LLM configuration.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Speech recognition configuration.
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS origins; empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration.
///
/// A missing URL is not fatal: the server starts with the store marked
/// unavailable.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    1800 // 30 minutes
}

/// OpenAI-compatible chat completion settings for itinerary generation.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// API key; without it the template planner is used.
    pub api_key: Option<String>,
    /// Base URL of the compatible endpoint.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature, passed through as-is.
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Maximum completion tokens.
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    /// Attempts before falling back to the template itinerary.
    #[serde(default = "default_llm_attempts")]
    pub max_attempts: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_llm_timeout(),
            max_attempts: default_llm_attempts(),
        }
    }
}

fn default_llm_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_llm_model() -> String {
    "qwen-turbo".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_max_tokens() -> u32 {
    16000
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_llm_attempts() -> u32 {
    3
}

/// iFlytek streaming dictation credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// Application ID.
    pub app_id: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// API secret used for request signing.
    pub api_secret: Option<String>,
    /// Websocket host.
    #[serde(default = "default_speech_host")]
    pub host: String,
    /// Websocket path.
    #[serde(default = "default_speech_path")]
    pub path: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            api_secret: None,
            host: default_speech_host(),
            path: default_speech_path(),
        }
    }
}

impl SpeechConfig {
    /// Returns `(app_id, api_key, api_secret)` when all three are set and non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        fn pick(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        Some((
            pick(&self.app_id)?,
            pick(&self.api_key)?,
            pick(&self.api_secret)?,
        ))
    }
}

fn default_speech_host() -> String {
    "iat-api.xfyun.cn".to_string()
}

fn default_speech_path() -> String {
    "/v2/iat".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
