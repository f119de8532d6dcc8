use serde::Deserialize;
use std::time::Duration;

/// Upper bound on retries for a single provider call
pub const MAX_PROVIDER_RETRIES: u32 = 1;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. Films are kept in memory when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Popcorn Time API base URL
    #[serde(default = "default_popcorn_api_url")]
    pub popcorn_api_url: String,

    /// YTS API base URL
    #[serde(default = "default_yts_api_url")]
    pub yts_api_url: String,

    /// Yandex Translate endpoint
    #[serde(default = "default_translate_api_url")]
    pub translate_api_url: String,

    /// Yandex Translate API key
    #[serde(default)]
    pub translate_api_key: Option<String>,

    /// Per-attempt timeout for outbound provider calls
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Retries on transport failure, clamped to `MAX_PROVIDER_RETRIES`
    #[serde(default = "default_provider_max_retries")]
    pub provider_max_retries: u32,

    /// User-Agent sent to the movie APIs
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_popcorn_api_url() -> String {
    "https://tv-v2.api-fetch.website".to_string()
}

fn default_yts_api_url() -> String {
    "https://yts.lt/api/v2".to_string()
}

fn default_translate_api_url() -> String {
    "https://translate.yandex.net/api/v1.5/tr.json/translate".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_provider_max_retries() -> u32 {
    MAX_PROVIDER_RETRIES
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn provider_retries(&self) -> u32 {
        self.provider_max_retries.min(MAX_PROVIDER_RETRIES)
    }
}
