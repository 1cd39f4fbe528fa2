//! Client configuration loaded from environment variables.

use std::time::Duration;

/// Where the storefront finds the API and how long it waits for it.
///
/// Reads from environment variables:
/// - `MEDISHOP_API_URL`: API base URL (default: `"http://localhost:3000/api"`)
/// - `MEDISHOP_TIMEOUT_SECS`: per-request timeout (default: `30`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for `api_url` with the default timeout.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("MEDISHOP_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            timeout: lookup("MEDISHOP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}
