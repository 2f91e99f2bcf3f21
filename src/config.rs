//! Client configuration.
//!
//! The only knob is the backend base URL, taken from the `GROCERME_API_URL`
//! environment variable at startup. Everything else (credentials, session
//! cookies) lives server-side or in the HTTP client's cookie store.

use serde::{Deserialize, Serialize};

/// Environment variable holding the backend base URL
const API_URL_VAR: &str = "GROCERME_API_URL";

/// Base URL used when the environment variable is unset or empty
const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
}

impl Config {
    /// Build a config pointing at the given base URL. A trailing slash is
    /// trimmed so endpoint paths can always be appended as `/path`.
    pub fn new(api_url: impl Into<String>) -> Self {
        let mut api_url = api_url.into();
        while api_url.ends_with('/') {
            api_url.pop();
        }
        Self { api_url }
    }

    /// Read the base URL from the environment, falling back to the local
    /// development default. An empty variable counts as unset.
    pub fn from_env() -> Self {
        let api_url = std::env::var(API_URL_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(api_url)
    }

    /// Full URL for an endpoint path (the path must start with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
