use anyhow::{Context, Result};

pub const APP_NAME: &str = "Hearth Property Search";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub patma_api_key: String,
    pub claude_model: String,
    pub claude_max_tokens: u32,
    pub patma_base_url: String,
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables, reading a `.env` file
    /// first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        let patma_api_key = std::env::var("PATMA_API_KEY")
            .context("PATMA_API_KEY environment variable not set")?;

        let claude_model = std::env::var("CLAUDE_MODEL")
            .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string());
        let claude_max_tokens = std::env::var("CLAUDE_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1024);
        let patma_base_url = std::env::var("PATMA_BASE_URL")
            .unwrap_or_else(|_| "https://app.patma.co.uk/api".to_string());

        let web_host = std::env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let web_port = std::env::var("WEB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);

        Ok(Self {
            anthropic_api_key,
            patma_api_key,
            claude_model,
            claude_max_tokens,
            patma_base_url,
            web_host,
            web_port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}
