//! Batch sync results.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SyncError;
use crate::model::TrackedIndividual;

/// Result of one individual's sync within a batch.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The record as persisted after a successful sync.
    Synced(Box<TrackedIndividual>),
    Failed(SyncError),
}

impl SyncOutcome {
    /// Identifier of the individual this outcome belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Synced(record) => &record.id,
            Self::Failed(err) => &err.id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

impl From<Result<TrackedIndividual, SyncError>> for SyncOutcome {
    fn from(result: Result<TrackedIndividual, SyncError>) -> Self {
        match result {
            Ok(record) => Self::Synced(Box::new(record)),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Outcome of a whole-roster sync.
///
/// Holds exactly one entry per individual actually attempted, in roster
/// order. When the batch was cancelled, individuals that were never started
/// are absent and `cancelled` is set.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    pub cancelled: bool,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Every failure, in roster order.
    pub fn failures(&self) -> impl Iterator<Item = &SyncError> {
        self.outcomes.iter().filter_map(|o| match o {
            SyncOutcome::Failed(err) => Some(err),
            SyncOutcome::Synced(_) => None,
        })
    }

    /// Serializable view for reporting surfaces.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            attempted: self.attempted(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            cancelled: self.cancelled,
            entries: self.outcomes.iter().map(ReportEntry::from).collect(),
        }
    }
}

/// Flat, serializable form of a [`SyncReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ReportEntry {
    Synced {
        id: String,
        handle: String,
        current_rating: i32,
        total_solved: u32,
        last_sync: Option<DateTime<Utc>>,
    },
    Failed {
        id: String,
        handle: String,
        stage: String,
        error: String,
    },
}

impl From<&SyncOutcome> for ReportEntry {
    fn from(outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Synced(record) => Self::Synced {
                id: record.id.clone(),
                handle: record.codeforces_handle.clone(),
                current_rating: record.current_rating,
                total_solved: record.problem_solving_stats.total_solved,
                last_sync: record.last_sync,
            },
            SyncOutcome::Failed(err) => Self::Failed {
                id: err.id.clone(),
                handle: err.handle.clone(),
                stage: err.stage.to_string(),
                error: err.cause.to_string(),
            },
        }
    }
}
