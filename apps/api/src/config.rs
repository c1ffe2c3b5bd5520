use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
/// Provider keys are optional; a missing key selects the deterministic fixture source.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means scores live in process memory only.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub github_api_base: String,
    pub github_token: Option<String>,
    pub covalent_api_key: Option<String>,
    pub covalent_chain_id: String,
    pub poap_api_key: Option<String>,
    pub verifier_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = std::env::var("VERIFIER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("VERIFIER_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            github_api_base: optional_env("GITHUB_API_BASE")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string()),
            github_token: optional_env("GITHUB_TOKEN"),
            covalent_api_key: optional_env("COVALENT_API_KEY"),
            covalent_chain_id: optional_env("COVALENT_CHAIN_ID").unwrap_or_else(|| "1".to_string()),
            poap_api_key: optional_env("POAP_API_KEY"),
            verifier_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

/// Reads `key`, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
