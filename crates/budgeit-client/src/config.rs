//! Client configuration.

use std::fmt;
use std::time::Duration;

use budgeit_core::error::InvalidInputError;
use budgeit_core::{ApiUrl, Result};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "BUDGEIT_API_URL";

/// Environment variable holding the optional API key.
pub const API_KEY_ENV: &str = "BUDGEIT_API_KEY";

/// Timeout for ordinary API requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the token refresh call so a hung refresh cannot stall
/// every request waiting on it.
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`SessionClient`](crate::SessionClient) and its transport.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto.
    pub base_url: ApiUrl,
    /// Sent as `X-API-KEY` on every request when set.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub refresh_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with default timeouts and no API key.
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            user_agent: concat!("budgeit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read `BUDGEIT_API_URL` and `BUDGEIT_API_KEY` from the environment.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(API_URL_ENV).map_err(|_| InvalidInputError::Other {
            message: format!("{} is not set", API_URL_ENV),
        })?;

        let mut config = Self::new(ApiUrl::new(url)?);
        config.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("refresh_timeout", &self.refresh_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new(ApiUrl::new("https://api.budgeit.app").unwrap());
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.refresh_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("budgeit/"));
    }

    #[test]
    fn debug_hides_api_key() {
        let config = ClientConfig::new(ApiUrl::new("https://api.budgeit.app").unwrap())
            .with_api_key("super-secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
