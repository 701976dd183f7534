use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// Redis URL is optional; if absent, the server runs without cached reports and
/// recomputes on every request. The chat client carries its own env-driven
/// configuration (`score_common::chat::ChatClientConfig`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    /// Base URL of the wiki content API.
    pub wiki_api_url: String,
    /// Timeout for content fetches, in seconds.
    pub content_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `WIKI_API_URL`: base URL of the wiki content API
    ///
    /// Optional:
    /// - `REDIS_URL`: Redis connection string (omit to disable caching)
    /// - `WIKI_API_TIMEOUT_SECS`: content fetch timeout (default 10)
    pub fn from_env() -> Result<Self, AppError> {
        let wiki_api_url = std::env::var("WIKI_API_URL").map_err(|_| {
            AppError::Config("WIKI_API_URL environment variable is required".to_string())
        })?;

        let content_timeout_secs = std::env::var("WIKI_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let redis_url = std::env::var("REDIS_URL").ok();

        Ok(Self {
            redis_url,
            wiki_api_url,
            content_timeout_secs,
        })
    }
}
