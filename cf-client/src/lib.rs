//! # cf-client
//!
//! Typed accessor for the three read-only Codeforces API operations the
//! roster tracker needs: profile info, rating-change history, and submission
//! history.
//!
//! ## Design
//!
//! - One [`ActivitySource`] trait so callers can swap in scripted sources
//! - [`CodeforcesClient`] talks to `https://codeforces.com/api` over HTTPS
//! - Every call is a fresh round trip: no caching, no retry
//! - Consecutive requests are spaced by a jittered delay to stay under the
//!   platform's published rate limit
//!
//! Failures are reported as [`FetchError`], carrying the handle, the endpoint
//! and a [`FetchCause`].

pub mod codeforces;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod source;
pub mod types;

pub use codeforces::CodeforcesClient;
pub use config::ClientConfig;
pub use error::{ClientError, Endpoint, FetchCause, FetchError, Result};
pub use source::ActivitySource;
pub use types::{ContestEvent, Problem, ProblemKey, Profile, Submission, Verdict};
