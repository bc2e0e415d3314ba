use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GENERATION_URL: &str = "http://localhost:5000/api/generate";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub generation_url: String,
    pub generation_timeout: Duration,
    /// Sessions not accessed for this long are discarded.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generation_url: std::env::var("GENERATION_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_URL.to_string()),
            generation_timeout: Duration::from_secs(
                std::env::var("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_ttl: Duration::from_secs(
                std::env::var("SESSION_TTL_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse::<u64>()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
