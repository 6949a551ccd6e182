//! Connection settings for the Civo API.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.civo.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_TOKEN: &str = "CIVO_TOKEN";
pub const ENV_API_URL: &str = "CIVO_API_URL";
pub const ENV_REGION: &str = "CIVO_REGION";
pub const ENV_TIMEOUT_SECS: &str = "CIVO_TIMEOUT_SECS";

/// Settings shared by `CivoClient` and the ureq transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub region: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            region: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from `CIVO_TOKEN`, `CIVO_API_URL`, `CIVO_REGION` and
    /// `CIVO_TIMEOUT_SECS`. Only the token is required.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(ENV_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::ConfigError(format!("{ENV_TOKEN} is not set")))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }
        config.region = lookup(ENV_REGION).filter(|v| !v.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| {
                ApiError::ConfigError(format!("{ENV_TIMEOUT_SECS} must be a whole number, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
