//! Client configuration with sensible defaults.
//!
//! [`ClientConfig`] controls the API base URL, request timeout, and the
//! spacing between consecutive requests. The defaults follow the platform's
//! published limit of one call every two seconds.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Public Codeforces API root.
pub const DEFAULT_BASE_URL: &str = "https://codeforces.com/api";

/// Configuration for a [`crate::CodeforcesClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without a trailing slash. Overridden in tests to point at a mock server.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Random spacing range in milliseconds `(min, max)` enforced between
    /// consecutive requests from the same client.
    pub request_delay_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, a crate-identifying default is sent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_seconds: 15,
            request_delay_ms: (2000, 2500),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - `base_url` must be an `http`/`https` URL
    /// - `timeout_seconds` must be greater than 0
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ClientError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(ClientError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }

    /// Full URL for an API method, e.g. `user.status`.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.request_delay_ms, (2000, 2500));
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn invalid_delay_range_rejected() {
        let config = ClientConfig {
            request_delay_ms: (500, 100),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delay"));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let config = ClientConfig {
            base_url: "ftp://codeforces.com/api".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_delay_range_valid() {
        let config = ClientConfig {
            request_delay_ms: (0, 0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn method_url_tolerates_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9000/api/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.method_url("user.info"),
            "http://127.0.0.1:9000/api/user.info"
        );
    }
}
