//! Synchronization engine.
//!
//! - `orchestrator`: [`SyncOrchestrator`] with `sync_one` / `sync_all`.
//! - `report`: per-individual outcomes and the batch [`SyncReport`].
//! - `enroll`: enrollment, editing, and removal, which share the
//!   orchestrator's per-individual locking.
//! - `locks`: [`RecordLocks`], keyed async mutexes shared with every other
//!   writer of the roster.

mod enroll;
mod locks;
pub mod orchestrator;
pub mod report;

pub use locks::RecordLocks;
pub use orchestrator::SyncOrchestrator;
pub use report::{ReportEntry, ReportSummary, SyncOutcome, SyncReport};
