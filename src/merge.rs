//! Applying a fetched snapshot onto a stored record.
//!
//! The merge is a pure function: it returns a new record and never touches
//! the store. Rating fields, contest history and the problem-solving summary
//! are replaced wholesale; identity and reminder fields are carried over.

use cf_client::{ContestEvent, Profile};
use chrono::{DateTime, Utc};

use crate::error::AggregationError;
use crate::model::{ContestResult, ProblemSolvingSummary, TrackedIndividual};

/// Produce the post-sync version of `record`.
///
/// # Errors
///
/// Returns [`AggregationError::InvalidContestTimestamp`] if any contest
/// event's update time is out of range. Nothing is merged in that case.
pub fn apply_sync(
    record: &TrackedIndividual,
    profile: &Profile,
    history: &[ContestEvent],
    summary: ProblemSolvingSummary,
    synced_at: DateTime<Utc>,
) -> Result<TrackedIndividual, AggregationError> {
    let contest_history = history
        .iter()
        .map(contest_result)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrackedIndividual {
        current_rating: profile.rating,
        max_rating: profile.max_rating,
        contest_history,
        problem_solving_stats: summary,
        last_sync: Some(synced_at),
        ..record.clone()
    })
}

/// Map one platform contest event to a stored [`ContestResult`].
///
/// # Errors
///
/// Returns [`AggregationError::InvalidContestTimestamp`] when the update time
/// cannot be represented as a UTC instant.
pub fn contest_result(event: &ContestEvent) -> Result<ContestResult, AggregationError> {
    let seconds = event.rating_update_time_seconds;
    let date = DateTime::from_timestamp(seconds, 0).ok_or(
        AggregationError::InvalidContestTimestamp {
            contest_id: event.contest_id,
            seconds,
        },
    )?;

    Ok(ContestResult {
        contest_id: event.contest_id,
        contest_name: event.contest_name.clone(),
        rank: event.rank,
        rating_change: event.rating_change(),
        new_rating: event.new_rating,
        date,
    })
}
