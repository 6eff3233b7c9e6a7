//! Roster record types.
//!
//! A [`TrackedIndividual`] is the persisted unit. Its rating fields, contest
//! history, and [`ProblemSolvingSummary`] are replaced wholesale by each
//! successful sync; identity fields are only changed through enrollment or
//! direct edits.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// A 100-wide difficulty bucket keyed by its lower bound.
///
/// Only non-negative multiples of [`RatingBand::WIDTH`] can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RatingBand(u32);

impl RatingBand {
    pub const WIDTH: u32 = 100;

    /// Band for an exact lower bound.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRatingBand`] when `lower_bound` is not a multiple of 100.
    pub fn new(lower_bound: u32) -> Result<Self, InvalidRatingBand> {
        if lower_bound % Self::WIDTH == 0 {
            Ok(Self(lower_bound))
        } else {
            Err(InvalidRatingBand(lower_bound))
        }
    }

    /// Band containing `rating`; unrated problems fall in band 0.
    pub fn of_rating(rating: Option<u32>) -> Self {
        let rating = rating.unwrap_or(0);
        Self(rating / Self::WIDTH * Self::WIDTH)
    }

    pub fn lower_bound(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RatingBand {
    type Error = InvalidRatingBand;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingBand> for u32 {
    fn from(band: RatingBand) -> Self {
        band.0
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.0 + Self::WIDTH - 1)
    }
}

/// Rejected rating-band key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating band {0} is not a multiple of 100")]
pub struct InvalidRatingBand(pub u32);

/// One rated contest participation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestResult {
    pub contest_id: u64,
    pub contest_name: String,
    pub rank: u32,
    /// `new_rating - old_rating`, with a missing old rating counted as 0.
    pub rating_change: i32,
    pub new_rating: i32,
    pub date: DateTime<Utc>,
}

/// Problem-solving statistics derived from accepted submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemSolvingSummary {
    /// Distinct `(contest, index)` problems with an accepted submission.
    pub total_solved: u32,
    /// Mean problem rating over the distinct solved set; 0 when empty.
    pub average_rating: f64,
    /// Distinct solved problems per difficulty band.
    pub rating_wise_solved: BTreeMap<RatingBand, u32>,
    /// Every accepted submission time, duplicates included, in source order.
    pub submission_dates: Vec<DateTime<Utc>>,
}

/// A roster member and their last synced platform activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedIndividual {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub codeforces_handle: String,
    /// 0 means unrated.
    #[serde(default)]
    pub current_rating: i32,
    #[serde(default)]
    pub max_rating: i32,
    /// Time of the last sync that completed without error.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disable_email_reminders: bool,
    #[serde(default)]
    pub reminder_emails_sent: u32,
    #[serde(default)]
    pub contest_history: Vec<ContestResult>,
    #[serde(default)]
    pub problem_solving_stats: ProblemSolvingSummary,
}

impl TrackedIndividual {
    /// Fresh record with zero ratings and empty history, under a new UUID.
    pub fn new(details: NewIndividual) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: details.name,
            email: details.email,
            phone_number: details.phone_number,
            codeforces_handle: details.codeforces_handle,
            current_rating: 0,
            max_rating: 0,
            last_sync: None,
            disable_email_reminders: false,
            reminder_emails_sent: 0,
            contest_history: Vec::new(),
            problem_solving_stats: ProblemSolvingSummary::default(),
        }
    }
}

/// Enrollment input for a new roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIndividual {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub codeforces_handle: String,
}

impl NewIndividual {
    /// Trim and normalise every field, then validate.
    ///
    /// - name: at least 2 characters
    /// - email: lowercased, `local@domain.tld` shape
    /// - handle: non-empty
    /// - phone (optional): 10–20 characters of digits, spaces, `+-.()`
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] naming the first offending field.
    pub fn normalized(self) -> Result<Self, RosterError> {
        let name = self.name.trim().to_owned();
        let email = self.email.trim().to_lowercase();
        let codeforces_handle = self.codeforces_handle.trim().to_owned();
        let phone_number = self
            .phone_number
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());

        if name.chars().count() < 2 {
            return Err(RosterError::Validation(
                "name must be at least 2 characters long".into(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(RosterError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if codeforces_handle.is_empty() {
            return Err(RosterError::Validation(
                "Codeforces handle is required".into(),
            ));
        }
        if let Some(ref phone) = phone_number {
            if !is_valid_phone(phone) {
                return Err(RosterError::Validation(format!(
                    "'{phone}' is not a valid phone number"
                )));
            }
        }

        Ok(Self {
            name,
            email,
            phone_number,
            codeforces_handle,
        })
    }
}

/// Partial edit of a roster member. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndividualPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// An empty string clears the stored number.
    pub phone_number: Option<String>,
    pub codeforces_handle: Option<String>,
    pub disable_email_reminders: Option<bool>,
}

impl IndividualPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl TrackedIndividual {
    /// Copy of this record with `patch` applied.
    ///
    /// Identity fields go through the same normalisation and validation as
    /// enrollment. Synced data is carried over untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] if the patched identity is invalid.
    pub fn patched(&self, patch: IndividualPatch) -> Result<Self, RosterError> {
        let identity = NewIndividual {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
            phone_number: patch.phone_number.or_else(|| self.phone_number.clone()),
            codeforces_handle: patch
                .codeforces_handle
                .unwrap_or_else(|| self.codeforces_handle.clone()),
        }
        .normalized()?;

        Ok(Self {
            name: identity.name,
            email: identity.email,
            phone_number: identity.phone_number,
            codeforces_handle: identity.codeforces_handle,
            disable_email_reminders: patch
                .disable_email_reminders
                .unwrap_or(self.disable_email_reminders),
            ..self.clone()
        })
    }
}

/// `something@domain.tld` with no whitespace and a single `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (10..=20).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || " +-.()".contains(c))
}
