//! Trait definition for the external activity source.
//!
//! [`crate::CodeforcesClient`] is the production implementation; tests and
//! offline tooling provide scripted ones.

use crate::error::FetchError;
use crate::types::{ContestEvent, Profile, Submission};

/// Read-only access to one platform's per-handle activity.
///
/// Implementations perform a fresh round trip on every call and must not
/// retry internally. All implementations must be `Send + Sync` so a single
/// source can back concurrent syncs for different handles.
pub trait ActivitySource: Send + Sync {
    /// Current and maximum rating for `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failure, a non-success response, or
    /// an unknown handle.
    fn fetch_profile(
        &self,
        handle: &str,
    ) -> impl std::future::Future<Output = Result<Profile, FetchError>> + Send;

    /// Rated contest participations, in the order the platform returns them.
    fn fetch_contest_history(
        &self,
        handle: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ContestEvent>, FetchError>> + Send;

    /// Every judged submission for `handle`.
    fn fetch_submissions(
        &self,
        handle: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Submission>, FetchError>> + Send;
}
