//! Error types for the cf-client crate.
//!
//! Messages are stable strings suitable for batch reports. Response bodies
//! are never echoed verbatim beyond the API's own `comment` field.

use std::fmt;

/// Which API operation a fetch was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `user.info`
    Profile,
    /// `user.rating`
    ContestHistory,
    /// `user.status`
    Submissions,
}

impl Endpoint {
    /// The Codeforces method name for this endpoint.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Profile => "user.info",
            Self::ContestHistory => "user.rating",
            Self::Submissions => "user.status",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchCause {
    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status without a decodable API envelope.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The API answered `FAILED` with the given comment.
    #[error("API failure: {0}")]
    Api(String),

    /// The platform does not know this handle.
    #[error("unknown handle")]
    UnknownHandle,

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A single failed round trip to the external source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{endpoint} failed for '{handle}': {cause}")]
pub struct FetchError {
    /// Handle the request was keyed by.
    pub handle: String,
    /// Operation that failed.
    pub endpoint: Endpoint,
    /// Underlying reason.
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(handle: impl Into<String>, endpoint: Endpoint, cause: FetchCause) -> Self {
        Self {
            handle: handle.into(),
            endpoint,
            cause,
        }
    }

    /// Returns `true` when the handle itself is at fault rather than the network.
    pub fn is_unknown_handle(&self) -> bool {
        self.cause == FetchCause::UnknownHandle
    }
}

/// Errors raised while constructing a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Convenience alias for fetch results.
pub type Result<T> = std::result::Result<T, FetchError>;
