//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    /// Bearer token sent on every request when set.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `GRAIN_BASE_URL`, `GRAIN_API_PREFIX`, `GRAIN_TOKEN` and
    /// `GRAIN_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = lookup("GRAIN_BASE_URL") {
            config.base_url = url;
        }
        if let Some(prefix) = lookup("GRAIN_API_PREFIX") {
            config.api_prefix = prefix;
        }
        config.token = lookup("GRAIN_TOKEN").filter(|t| !t.is_empty());
        if let Some(raw) = lookup("GRAIN_TIMEOUT_SECS") {
            config.timeout_secs = match raw.parse::<u64>() {
                Ok(0) => return Err(ApiError::Config("GRAIN_TIMEOUT_SECS must be at least 1".to_string())),
                Ok(secs) => secs,
                Err(_) => {
                    return Err(ApiError::Config(format!("GRAIN_TIMEOUT_SECS is not a number: {raw}")))
                }
            };
        }
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "base url must start with http:// or https://: {}",
                config.base_url
            )));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
