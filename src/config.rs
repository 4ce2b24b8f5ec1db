use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variable selecting the backend base URL
pub const API_URL_ENV: &str = "SCRIBE_API_URL";

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Application configuration.
///
/// Built once at startup and handed to whatever needs it. Nothing here is
/// written back to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Where the agent backend lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Config {
    /// Build configuration from the environment, letting an explicit URL
    /// (usually `--api-url`) take precedence.
    pub fn load(override_url: Option<&str>) -> Result<Self> {
        Self::resolve(std::env::var(API_URL_ENV).ok(), override_url)
    }

    /// Resolve the base URL: explicit override, then environment, then default.
    fn resolve(env_url: Option<String>, override_url: Option<&str>) -> Result<Self> {
        let raw = override_url
            .map(str::to_string)
            .or(env_url.filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(default_base_url);

        let base_url = normalize_base_url(&raw)?;
        tracing::debug!("Using backend at {}", base_url);

        Ok(Self {
            backend: BackendConfig { base_url },
        })
    }
}

/// Validate a base URL and strip trailing slashes so endpoint paths can be
/// appended directly.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("Invalid backend URL '{}': {}", raw, e))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Backend URL must use http or https: {}", raw);
    }

    Ok(trimmed.to_string())
}
