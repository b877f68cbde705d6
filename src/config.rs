use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// MusicBrainz web service root (the `/recording/` path is appended)
    #[serde(default = "default_musicbrainz_url")]
    pub musicbrainz_url: String,

    /// Cover Art Archive root
    #[serde(default = "default_cover_art_url")]
    pub cover_art_url: String,

    /// Identifying User-Agent sent with every outbound request
    #[serde(default = "default_user_agent")]
    pub mb_user_agent: String,

    /// Redis connection URL; the in-process cache is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Per-attempt timeout for search index requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_cover_art_timeout_secs")]
    pub cover_art_timeout_secs: u64,

    /// Lifetime of cached search responses
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Additional attempts after the first failed search request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_musicbrainz_url() -> String {
    "https://musicbrainz.org/ws/2".to_string()
}

fn default_cover_art_url() -> String {
    "https://coverartarchive.org".to_string()
}

fn default_user_agent() -> String {
    "NextTrack/0.1 (your-email@example.com)".to_string()
}

fn default_request_timeout_secs() -> u64 {
    6
}

fn default_cover_art_timeout_secs() -> u64 {
    5
}

fn default_cache_ttl_secs() -> u64 {
    60 * 15
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
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

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cover_art_timeout(&self) -> Duration {
        Duration::from_secs(self.cover_art_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
