//! Codeforces API client.
//!
//! Calls `user.info`, `user.rating`, and `user.status` and unwraps the
//! `{status, comment, result}` envelope. The API answers `FAILED` envelopes
//! with HTTP 400, so the body is inspected before the status code.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, Endpoint, FetchCause, FetchError};
use crate::gate::RequestGate;
use crate::http;
use crate::source::ActivitySource;
use crate::types::{ApiEnvelope, ApiStatus, ContestEvent, Profile, Submission};

/// HTTP-backed [`ActivitySource`] for codeforces.com.
///
/// Holds one pooled [`reqwest::Client`] and one [`RequestGate`], so clones of
/// a shared `Arc<CodeforcesClient>` stay under the platform's rate limit.
#[derive(Debug)]
pub struct CodeforcesClient {
    config: ClientConfig,
    http: reqwest::Client,
    gate: RequestGate,
}

impl CodeforcesClient {
    /// Build a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for invalid settings or
    /// [`ClientError::Http`] if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = http::build_client(&config)?;
        let gate = RequestGate::new(config.request_delay_ms);
        Ok(Self { config, http, gate })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        handle: &str,
        query_key: &str,
    ) -> Result<T, FetchError> {
        let fail = |cause: FetchCause| FetchError::new(handle, endpoint, cause);

        self.gate.wait().await;
        tracing::debug!(handle, %endpoint, "requesting");

        let response = self
            .http
            .get(self.config.method_url(endpoint.method()))
            .query(&[(query_key, handle)])
            .send()
            .await
            .map_err(|e| fail(FetchCause::Transport(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| fail(FetchCause::Transport(format!("response read failed: {e}"))))?;

        tracing::trace!(handle, %endpoint, status = status.as_u16(), bytes = body.len(), "response received");

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(fail(FetchCause::Status(status.as_u16()))),
            Err(e) => return Err(fail(FetchCause::Decode(e.to_string()))),
        };

        match envelope.status {
            ApiStatus::Failed => {
                let comment = envelope.comment.unwrap_or_default();
                Err(fail(classify_failure(comment)))
            }
            ApiStatus::Ok if !status.is_success() => Err(fail(FetchCause::Status(status.as_u16()))),
            ApiStatus::Ok => envelope
                .result
                .ok_or_else(|| fail(FetchCause::Decode("OK envelope without result".into()))),
        }
    }
}

/// Map a `FAILED` comment to a cause. The API reports unknown handles as
/// e.g. `handles: User with handle foo not found`.
fn classify_failure(comment: String) -> FetchCause {
    if comment.to_ascii_lowercase().contains("not found") {
        FetchCause::UnknownHandle
    } else {
        FetchCause::Api(comment)
    }
}

impl ActivitySource for CodeforcesClient {
    async fn fetch_profile(&self, handle: &str) -> Result<Profile, FetchError> {
        let users: Vec<Profile> = self.call(Endpoint::Profile, handle, "handles").await?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::new(handle, Endpoint::Profile, FetchCause::UnknownHandle))
    }

    async fn fetch_contest_history(&self, handle: &str) -> Result<Vec<ContestEvent>, FetchError> {
        self.call(Endpoint::ContestHistory, handle, "handle").await
    }

    async fn fetch_submissions(&self, handle: &str) -> Result<Vec<Submission>, FetchError> {
        self.call(Endpoint::Submissions, handle, "handle").await
    }
}
