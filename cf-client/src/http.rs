//! Shared HTTP client construction.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// User-Agent sent when the config does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("cf-client/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for API calls.
///
/// The client has the configured timeout, a stable User-Agent, and gzip /
/// brotli decompression. Redirects are limited since the API never
/// legitimately chains them.
///
/// # Errors
///
/// Returns [`ClientError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(3))
        .build()
        .map_err(|e| ClientError::Http(format!("failed to build HTTP client: {e}")))
}
