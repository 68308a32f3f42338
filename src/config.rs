use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::debug;

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Connection settings for the Proxy Service, read once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base URL of the Proxy Service, e.g. http://127.0.0.1:5000
    pub base_url: String,
    /// Shared secret used to sign bearer tokens.
    pub jwt_secret: String,
    /// Default request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Transport-level retry budget for connection failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            jwt_secret: jwt_secret.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).context("reading config file")?;
        let cfg: ProxyConfig = serde_json::from_str(&raw).context("parsing JSON")?;
        Ok(cfg)
    }

    /// Build the config from environment variables.
    ///
    /// Environment variables:
    /// - `PROXY_SERVICE_URL`: Base URL (required)
    /// - `PROXY_JWT_SECRET`: Token signing secret (required)
    /// - `PROXY_TIMEOUT_SECS`: Request timeout, default 30
    /// - `PROXY_MAX_RETRIES`: Transport retry budget, default 3
    pub fn from_env() -> Result<Option<Self>> {
        let base_url = std::env::var("PROXY_SERVICE_URL").ok();
        let jwt_secret = std::env::var("PROXY_JWT_SECRET").ok();

        match (base_url, jwt_secret) {
            (Some(base_url), Some(jwt_secret)) => {
                let timeout_secs = std::env::var("PROXY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_timeout_secs);
                let max_retries = std::env::var("PROXY_MAX_RETRIES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_max_retries);

                debug!("proxy config initialized with base_url={}", base_url);

                Ok(Some(ProxyConfig {
                    base_url,
                    jwt_secret,
                    timeout_secs,
                    max_retries,
                }))
            }
            _ => {
                debug!("proxy not configured (missing PROXY_SERVICE_URL or PROXY_JWT_SECRET)");
                Ok(None)
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
