use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Simulated-sensor sampling interval in seconds.
    pub poll_interval_secs: u64,
    /// Remote classifier credential. Absence is a supported state: the
    /// identification pipeline then runs entirely on the mock generator.
    pub classifier_api_key: Option<String>,
    pub classifier_base_url: String,
    pub classifier_model: String,
    /// Upper bound on one classifier call; a slower response is treated as a
    /// failure and resolved via fallback.
    pub classifier_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            poll_interval_secs: optional("POLL_INTERVAL_SECS", "60")
                .parse()
                .context("POLL_INTERVAL_SECS must be a positive integer")?,
            classifier_api_key: std::env::var("GEMINI_API_KEY").ok(),
            classifier_base_url: optional(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            classifier_model: optional("GEMINI_MODEL", "gemini-1.5-flash"),
            classifier_timeout_secs: optional("GEMINI_TIMEOUT_SECS", "15")
                .parse()
                .context("GEMINI_TIMEOUT_SECS must be a positive integer")?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
