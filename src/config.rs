use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
///
/// API keys are optional at startup. Handlers check for them before any
/// outbound call so a missing key surfaces as a configuration error response.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Completion service API key
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Completion service base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Completion model identifier
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Movie metadata API key
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Movie metadata API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to poster paths
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Timeout applied to every outbound call
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Retries for transient completion failures
    #[serde(default = "default_completion_max_retries")]
    pub completion_max_retries: u32,

    /// Maximum number of cached recommendations
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,

    /// Lifetime of a cached recommendation, 0 disables expiry
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Directory holding index.html and static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_completion_max_retries() -> u32 {
    2
}

fn default_cache_max_entries() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Parse configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    /// Ensures the metadata key is present
    pub fn require_metadata_key(&self) -> AppResult<()> {
        match self.tmdb_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(AppError::Configuration(
                "TMDB_API_KEY is not set".to_string(),
            )),
        }
    }

    /// Ensures both keys needed by the recommendation pipeline are present
    pub fn require_recommendation_keys(&self) -> AppResult<()> {
        match self.openai_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => self.require_metadata_key(),
            _ => Err(AppError::Configuration(
                "OPENAI_API_KEY is not set".to_string(),
            )),
        }
    }
}
