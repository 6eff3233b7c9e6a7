//! Single-record and whole-roster synchronization.
//!
//! `sync_one` runs fetch → aggregate → merge → persist for one individual
//! while holding that individual's lock. `sync_all` fans `sync_one` out
//! over the roster with bounded concurrency and collects every outcome into
//! a [`SyncReport`]; one individual's failure never affects another's.

use std::sync::Arc;

use cf_client::ActivitySource;
use chrono::Utc;
use futures::StreamExt;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;

use super::locks::RecordLocks;
use super::report::{SyncOutcome, SyncReport};
use crate::aggregate::aggregate;
use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::error::{PersistError, SyncCause, SyncError, SyncStage};
use crate::merge::apply_sync;
use crate::model::TrackedIndividual;
use crate::store::RecordStore;

/// Drives syncs of roster records against an [`ActivitySource`].
pub struct SyncOrchestrator<S> {
    source: S,
    store: Arc<dyn RecordStore>,
    max_concurrency: usize,
    locks: Arc<RecordLocks>,
}

impl<S: ActivitySource> SyncOrchestrator<S> {
    pub fn new(source: S, store: Arc<dyn RecordStore>) -> Self {
        Self {
            source,
            store,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            locks: Arc::new(RecordLocks::new()),
        }
    }

    /// Cap on concurrently running syncs in [`sync_all`](Self::sync_all).
    /// Values below 1 are raised to 1.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Share per-individual locks with other writers, such as a
    /// [`ReminderDispatcher`](crate::ReminderDispatcher).
    pub fn with_locks(mut self, locks: Arc<RecordLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &Arc<RecordLocks> {
        &self.locks
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Exclusive hold on one individual's record.
    pub(super) async fn lock(&self, id: &str) -> OwnedMutexGuard<()> {
        self.locks.acquire(id).await
    }

    /// Sync one individual by identifier.
    ///
    /// Waits for any in-flight sync of the same individual to finish first.
    /// The stored record is only written once every fetch has succeeded and
    /// the submissions have been aggregated; on any error it is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] tagged with the stage that failed.
    pub async fn sync_one(&self, id: &str) -> Result<TrackedIndividual, SyncError> {
        let _guard = self.lock(id).await;

        let record = self
            .store
            .get_by_id(id)
            .await
            .map_err(|e| SyncError::new(id, "", SyncStage::Load, e))?;

        let result = self.refresh(&record).await;
        match &result {
            Ok(updated) => tracing::info!(
                id,
                handle = %updated.codeforces_handle,
                rating = updated.current_rating,
                solved = updated.problem_solving_stats.total_solved,
                "individual synced"
            ),
            Err(err) => tracing::warn!(
                id,
                handle = %err.handle,
                stage = %err.stage,
                error = %err.cause,
                "individual sync failed"
            ),
        }
        result
    }

    /// Sync every individual in the roster, each exactly once.
    ///
    /// At most `max_concurrency` syncs run at a time. `cancel` is checked
    /// before each individual starts; once it fires no further syncs begin,
    /// in-flight ones run to completion, and the report lists only the
    /// individuals actually attempted.
    ///
    /// # Errors
    ///
    /// Fails only if the roster itself cannot be read. Per-individual
    /// failures are recorded in the report.
    pub async fn sync_all(&self, cancel: &CancellationToken) -> Result<SyncReport, PersistError> {
        let roster = self.store.get_all().await?;
        let total = roster.len();
        tracing::info!(
            total,
            max_concurrency = self.max_concurrency,
            "starting roster sync"
        );

        let mut attempted: Vec<(usize, SyncOutcome)> =
            futures::stream::iter(roster.into_iter().enumerate())
                .map(move |(position, record)| async move {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let outcome = SyncOutcome::from(self.sync_one(&record.id).await);
                    Some((position, outcome))
                })
                .buffer_unordered(self.max_concurrency)
                .filter_map(|outcome| async move { outcome })
                .collect()
                .await;
        attempted.sort_by_key(|(position, _)| *position);

        let report = SyncReport {
            cancelled: attempted.len() < total,
            outcomes: attempted.into_iter().map(|(_, outcome)| outcome).collect(),
        };
        tracing::info!(
            total,
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "roster sync finished"
        );
        Ok(report)
    }

    /// Fetch, aggregate, merge, and persist for an already loaded record.
    async fn refresh(&self, record: &TrackedIndividual) -> Result<TrackedIndividual, SyncError> {
        let handle = record.codeforces_handle.as_str();

        tracing::debug!(handle, "fetching profile");
        let profile = self
            .source
            .fetch_profile(handle)
            .await
            .map_err(stage_error(record, SyncStage::FetchProfile))?;

        tracing::debug!(handle, "fetching contest history");
        let history = self
            .source
            .fetch_contest_history(handle)
            .await
            .map_err(stage_error(record, SyncStage::FetchContestHistory))?;

        tracing::debug!(handle, "fetching submissions");
        let submissions = self
            .source
            .fetch_submissions(handle)
            .await
            .map_err(stage_error(record, SyncStage::FetchSubmissions))?;

        let summary = aggregate(&submissions).map_err(stage_error(record, SyncStage::Aggregate))?;
        tracing::debug!(
            handle,
            contests = history.len(),
            submissions = submissions.len(),
            solved = summary.total_solved,
            "aggregated activity"
        );

        let updated = apply_sync(record, &profile, &history, summary, Utc::now())
            .map_err(stage_error(record, SyncStage::Aggregate))?;
        self.store
            .save(&updated)
            .await
            .map_err(stage_error(record, SyncStage::Persist))
    }
}

fn stage_error<C: Into<SyncCause>>(
    record: &TrackedIndividual,
    stage: SyncStage,
) -> impl FnOnce(C) -> SyncError + '_ {
    move |cause| SyncError::new(record.id.as_str(), record.codeforces_handle.as_str(), stage, cause)
}
