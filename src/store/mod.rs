//! Persistent record storage.
//!
//! The sync engine reads and writes whole [`TrackedIndividual`] records by
//! identifier through [`RecordStore`].
//!
//! Sub-modules:
//! - `memory`: in-process `MemoryRecordStore` (tests, dry runs).
//! - `schema`: SQLite DDL definitions.
//! - `sqlite`: SQLite-backed `SqliteRecordStore`.

pub mod memory;
pub(crate) mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::PersistError;
use crate::model::TrackedIndividual;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Whole-record persistence contract.
///
/// `save` is an upsert keyed by `id`. Email and handle are unique across the
/// roster; a save that would collide with another record's email or handle
/// fails with [`PersistError::Conflict`] and writes nothing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, in insertion order.
    async fn get_all(&self) -> Result<Vec<TrackedIndividual>, PersistError>;

    /// One record, or [`PersistError::NotFound`].
    async fn get_by_id(&self, id: &str) -> Result<TrackedIndividual, PersistError>;

    /// Insert or replace `record`, returning the persisted value.
    async fn save(&self, record: &TrackedIndividual) -> Result<TrackedIndividual, PersistError>;

    /// Remove a record, or [`PersistError::NotFound`].
    async fn delete(&self, id: &str) -> Result<(), PersistError>;
}

/// Which unique field of `candidate` collides with `existing`, if any.
pub(crate) fn unique_conflict(
    existing: &TrackedIndividual,
    candidate: &TrackedIndividual,
) -> Option<String> {
    if existing.id == candidate.id {
        return None;
    }
    if existing.email == candidate.email {
        return Some(format!("email '{}' already registered", candidate.email));
    }
    if existing.codeforces_handle.eq_ignore_ascii_case(&candidate.codeforces_handle) {
        return Some(format!(
            "Codeforces handle '{}' already registered",
            candidate.codeforces_handle
        ));
    }
    None
}
