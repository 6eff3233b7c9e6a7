//! Submission aggregation: accepted-only, problem-deduplicated statistics.
//!
//! Difficulty statistics (`total_solved`, `average_rating`, bands) are
//! computed over the set of distinct `(contest, index)` problems, keeping the
//! first accepted submission seen per problem. The activity timeline
//! (`submission_dates`) keeps every accepted submission, duplicates
//! included, since cadence views need the raw stream.

use std::collections::{BTreeMap, HashSet};

use cf_client::{ProblemKey, Submission};
use chrono::{DateTime, Utc};

use crate::error::AggregationError;
use crate::model::{ProblemSolvingSummary, RatingBand};

/// Build a [`ProblemSolvingSummary`] from a raw submission list.
///
/// Non-accepted submissions are ignored entirely. An empty accepted set
/// yields the default summary.
///
/// # Errors
///
/// Returns [`AggregationError`] if an accepted submission has no problem key
/// or an unrepresentable timestamp.
pub fn aggregate(submissions: &[Submission]) -> Result<ProblemSolvingSummary, AggregationError> {
    let mut seen: HashSet<ProblemKey> = HashSet::new();
    let mut rating_sum: u64 = 0;
    let mut bands: BTreeMap<RatingBand, u32> = BTreeMap::new();
    let mut submission_dates = Vec::new();

    for sub in submissions.iter().filter(|s| s.is_accepted()) {
        let key = sub
            .problem
            .key()
            .ok_or(AggregationError::MissingProblemKey {
                submission_id: sub.id,
            })?;
        submission_dates.push(submission_time(sub)?);

        if !seen.insert(key) {
            continue;
        }
        let rating = sub.problem.rating;
        rating_sum += u64::from(rating.unwrap_or(0));
        *bands.entry(RatingBand::of_rating(rating)).or_insert(0) += 1;
    }

    let total_solved = seen.len();
    let average_rating = if total_solved == 0 {
        0.0
    } else {
        rating_sum as f64 / total_solved as f64
    };

    Ok(ProblemSolvingSummary {
        total_solved: total_solved as u32,
        average_rating,
        rating_wise_solved: bands,
        submission_dates,
    })
}

fn submission_time(sub: &Submission) -> Result<DateTime<Utc>, AggregationError> {
    DateTime::from_timestamp(sub.creation_time_seconds, 0).ok_or(
        AggregationError::InvalidTimestamp {
            submission_id: sub.id,
            seconds: sub.creation_time_seconds,
        },
    )
}
