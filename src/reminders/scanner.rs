//! Inactivity detection.

use chrono::{DateTime, Duration, Utc};

use crate::model::TrackedIndividual;

/// Whether `individual` should get a reminder at `now`.
///
/// Due means reminders are not suppressed and no accepted-submission time
/// falls inside `[now - window_days, now]`. Timestamps after `now` do not
/// count as recent activity.
pub fn is_due(individual: &TrackedIndividual, window_days: u32, now: DateTime<Utc>) -> bool {
    if individual.disable_email_reminders {
        return false;
    }
    let window_start = now - Duration::days(i64::from(window_days));
    !individual
        .problem_solving_stats
        .submission_dates
        .iter()
        .any(|t| *t >= window_start && *t <= now)
}

/// Every due individual, in the order given.
pub fn find_due(
    individuals: &[TrackedIndividual],
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<&TrackedIndividual> {
    individuals
        .iter()
        .filter(|i| is_due(i, window_days, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewIndividual;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn with_activity(handle: &str, days_ago: &[i64]) -> TrackedIndividual {
        let mut r = TrackedIndividual::new(NewIndividual {
            name: handle.into(),
            email: format!("{handle}@example.com"),
            phone_number: None,
            codeforces_handle: handle.into(),
        });
        r.problem_solving_stats.submission_dates =
            days_ago.iter().map(|d| now() - Duration::days(*d)).collect();
        r
    }

    #[test]
    fn old_activity_is_due_recent_is_not() {
        assert!(is_due(&with_activity("old", &[10]), 7, now()));
        assert!(!is_due(&with_activity("recent", &[3]), 7, now()));
    }

    #[test]
    fn no_activity_is_due_unless_suppressed() {
        let mut idle = with_activity("idle", &[]);
        assert!(is_due(&idle, 7, now()));
        idle.disable_email_reminders = true;
        assert!(!is_due(&idle, 7, now()));
    }

    #[test]
    fn suppressed_with_old_activity_is_not_due() {
        let mut r = with_activity("quiet", &[30]);
        r.disable_email_reminders = true;
        assert!(!is_due(&r, 7, now()));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        assert!(!is_due(&with_activity("edge", &[7]), 7, now()));
        assert!(!is_due(&with_activity("now", &[0]), 7, now()));
    }

    #[test]
    fn future_timestamps_do_not_count() {
        assert!(is_due(&with_activity("ahead", &[-2]), 7, now()));
    }

    #[test]
    fn any_recent_timestamp_is_enough() {
        assert!(!is_due(&with_activity("mixed", &[40, 20, 1]), 7, now()));
    }

    #[test]
    fn find_due_keeps_input_order() {
        let roster = vec![
            with_activity("a", &[]),
            with_activity("b", &[2]),
            with_activity("c", &[9]),
        ];
        let due: Vec<&str> = find_due(&roster, 7, now())
            .into_iter()
            .map(|r| r.codeforces_handle.as_str())
            .collect();
        assert_eq!(due, vec!["a", "c"]);
    }
}
