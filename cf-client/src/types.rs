//! Wire types for the Codeforces API responses the client consumes.
//!
//! Only the fields the roster tracker reads are modelled; unknown fields are
//! ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope wrapped around every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: ApiStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

/// Top-level outcome reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Ok,
    Failed,
}

/// Rating snapshot from `user.info`. Unrated users report 0 for both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub handle: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub max_rating: i32,
}

/// One rated contest participation from `user.rating`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestEvent {
    pub contest_id: u64,
    pub contest_name: String,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_rating: Option<i32>,
    pub new_rating: i32,
    /// Unix seconds at which the rating change was published.
    pub rating_update_time_seconds: i64,
}

impl ContestEvent {
    /// `new_rating - old_rating`, treating a missing old rating as 0.
    pub fn rating_change(&self) -> i32 {
        self.new_rating - self.old_rating.unwrap_or(0)
    }
}

/// Judge verdict for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Ok,
    Failed,
    Partial,
    CompilationError,
    RuntimeError,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolated,
    Crashed,
    Challenged,
    Skipped,
    Testing,
    Rejected,
    #[serde(other)]
    Other,
}

impl Verdict {
    /// Whether this verdict means the problem was solved.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Problem metadata embedded in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<u64>,
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub name: String,
    /// Difficulty rating; absent for unrated problems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

impl Problem {
    /// Identity of this problem, or `None` when the contest id or index is missing.
    pub fn key(&self) -> Option<ProblemKey> {
        let contest_id = self.contest_id?;
        let index = self.index.trim();
        if index.is_empty() {
            return None;
        }
        Some(ProblemKey {
            contest_id,
            index: index.to_owned(),
        })
    }
}

/// `(contest id, problem index)` pair identifying a distinct problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemKey {
    pub contest_id: u64,
    pub index: String,
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.contest_id, self.index)
    }
}

/// One judged attempt from `user.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: u64,
    /// Unix seconds at which the attempt was submitted.
    pub creation_time_seconds: i64,
    pub problem: Problem,
    /// Absent while a submission is still queued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_some_and(|v| v.is_accepted())
    }
}
