//! Error types for the roster sync engine.

use std::fmt;

use cf_client::{ClientError, FetchError};

/// Malformed submission data that prevents computing statistics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    /// An accepted submission lacks a contest id or problem index.
    #[error("accepted submission {submission_id} has no problem key")]
    MissingProblemKey { submission_id: u64 },

    /// An accepted submission carries a timestamp outside the representable range.
    #[error("accepted submission {submission_id} has invalid timestamp {seconds}")]
    InvalidTimestamp { submission_id: u64, seconds: i64 },

    /// A contest rating update carries a timestamp outside the representable range.
    #[error("contest {contest_id} has invalid rating update time {seconds}")]
    InvalidContestTimestamp { contest_id: u64, seconds: i64 },
}

/// Record store failures.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record not found: {0}")]
    NotFound(String),

    /// A unique field (email or handle) already belongs to another record.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("lock poisoned: {0}")]
    Lock(String),

    /// The store is reachable but refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Step of a single-record sync at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    Load,
    FetchProfile,
    FetchContestHistory,
    FetchSubmissions,
    Aggregate,
    Persist,
}

impl SyncStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::FetchProfile => "fetch_profile",
            Self::FetchContestHistory => "fetch_contest_history",
            Self::FetchSubmissions => "fetch_submissions",
            Self::Aggregate => "aggregate",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying reason for a [`SyncError`].
#[derive(Debug, thiserror::Error)]
pub enum SyncCause {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A failed sync of one individual, tagged with who and how far it got.
#[derive(Debug, thiserror::Error)]
#[error("sync of {id} ('{handle}') failed at {stage}: {cause}")]
pub struct SyncError {
    /// Record identifier.
    pub id: String,
    /// Platform handle; empty if the record could not be loaded.
    pub handle: String,
    pub stage: SyncStage,
    #[source]
    pub cause: SyncCause,
}

impl SyncError {
    pub fn new(
        id: impl Into<String>,
        handle: impl Into<String>,
        stage: SyncStage,
        cause: impl Into<SyncCause>,
    ) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            stage,
            cause: cause.into(),
        }
    }

    /// Whether the failure came from the external source.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self.cause, SyncCause::Fetch(_))
    }
}

/// A notification could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("send to {address} failed: {reason}")]
pub struct SendError {
    pub address: String,
    pub reason: String,
}

/// Top-level error type for roster operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Rejected enrollment or edit input.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("store error: {0}")]
    Persist(#[from] PersistError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cf_client::{Endpoint, FetchCause};

    #[test]
    fn sync_error_display_names_stage_and_cause() {
        let fetch = FetchError::new("bob", Endpoint::ContestHistory, FetchCause::Status(502));
        let err = SyncError::new("id-1", "bob", SyncStage::FetchContestHistory, fetch);
        assert_eq!(
            err.to_string(),
            "sync of id-1 ('bob') failed at fetch_contest_history: user.rating failed for 'bob': HTTP status 502"
        );
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn aggregation_cause_is_not_fetch_failure() {
        let err = SyncError::new(
            "id-2",
            "carol",
            SyncStage::Aggregate,
            AggregationError::MissingProblemKey { submission_id: 9 },
        );
        assert!(!err.is_fetch_failure());
        assert!(err.to_string().contains("submission 9 has no problem key"));
    }

    #[test]
    fn persist_not_found_display() {
        let err = PersistError::NotFound("abc".into());
        assert_eq!(err.to_string(), "record not found: abc");
    }

    #[test]
    fn roster_error_wraps_sync_error_transparently() {
        let err: RosterError = SyncError::new(
            "id-3",
            "",
            SyncStage::Load,
            PersistError::NotFound("id-3".into()),
        )
        .into();
        assert!(err.to_string().starts_with("sync of id-3"));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncError>();
        assert_send_sync::<RosterError>();
        assert_send_sync::<PersistError>();
    }
}
