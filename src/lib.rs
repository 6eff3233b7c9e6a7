//! cf-roster: keeps a roster of people in step with their Codeforces activity.
//!
//! # Architecture
//!
//! - **Activity source**: [`cf_client::ActivitySource`], backed in production
//!   by [`cf_client::CodeforcesClient`]
//! - **Aggregation**: [`aggregate::aggregate`] turns raw submissions into a
//!   deduplicated [`ProblemSolvingSummary`]
//! - **Merge**: [`merge::apply_sync`] produces the post-sync record
//! - **Orchestration**: [`SyncOrchestrator`] runs single and whole-roster
//!   syncs with per-individual isolation and locking
//! - **Storage**: [`RecordStore`] with in-memory and SQLite backends
//! - **Reminders**: [`reminders::find_due`] and [`ReminderDispatcher`]

pub mod aggregate;
pub mod config;
pub mod dirs;
pub mod error;
pub mod merge;
pub mod model;
pub mod reminders;
pub mod store;
pub mod sync;

pub use config::{ReminderConfig, RosterConfig, StoreConfig, SyncConfig};
pub use error::{
    AggregationError, PersistError, Result, RosterError, SendError, SyncCause, SyncError,
    SyncStage,
};
pub use model::{
    ContestResult, IndividualPatch, InvalidRatingBand, NewIndividual, ProblemSolvingSummary,
    RatingBand, TrackedIndividual,
};
pub use reminders::{NotificationSender, ReminderDispatcher, ReminderReport, TracingSender};
pub use store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
pub use sync::{RecordLocks, SyncOrchestrator, SyncOutcome, SyncReport};
