//! Adding, editing, and removing roster members.

use cf_client::ActivitySource;

use super::orchestrator::SyncOrchestrator;
use crate::error::{PersistError, Result};
use crate::model::{IndividualPatch, NewIndividual, TrackedIndividual};
use crate::store::unique_conflict;

impl<S: ActivitySource> SyncOrchestrator<S> {
    /// Enroll a new individual and run their first sync.
    ///
    /// Input is normalised and validated, the email and handle are checked
    /// against the roster, and the handle is confirmed to exist on the
    /// platform before anything is written. A failed initial sync is logged
    /// and the freshly created record is returned anyway.
    ///
    /// # Errors
    ///
    /// - [`RosterError::Validation`](crate::RosterError::Validation) for bad input.
    /// - [`RosterError::Persist`](crate::RosterError::Persist) with
    ///   [`PersistError::Conflict`] when the email or handle is taken.
    /// - [`RosterError::Fetch`](crate::RosterError::Fetch) when the handle
    ///   cannot be confirmed.
    pub async fn enroll(&self, details: NewIndividual) -> Result<TrackedIndividual> {
        let candidate = TrackedIndividual::new(details.normalized()?);

        let roster = self.store().get_all().await?;
        if let Some(conflict) = roster.iter().find_map(|r| unique_conflict(r, &candidate)) {
            return Err(PersistError::Conflict(conflict).into());
        }

        let profile = self
            .source()
            .fetch_profile(&candidate.codeforces_handle)
            .await?;
        tracing::debug!(handle = %profile.handle, rating = profile.rating, "handle confirmed");

        let created = self.store().save(&candidate).await?;
        tracing::info!(id = %created.id, handle = %created.codeforces_handle, "individual enrolled");

        match self.sync_one(&created.id).await {
            Ok(synced) => Ok(synced),
            Err(err) => {
                tracing::warn!(
                    id = %created.id,
                    stage = %err.stage,
                    error = %err.cause,
                    "initial sync failed; keeping unsynced record"
                );
                Ok(created)
            }
        }
    }

    /// Edit an individual's identity fields or reminder preference.
    ///
    /// The patched record is validated like an enrollment and checked for
    /// email and handle clashes with everyone else, all under the
    /// individual's lock. A changed handle triggers a resync once the edit is
    /// saved; if that sync fails the edit still stands and is returned.
    ///
    /// # Errors
    ///
    /// - [`RosterError::Persist`](crate::RosterError::Persist) with
    ///   [`PersistError::NotFound`] for an unknown id, or
    ///   [`PersistError::Conflict`] when the new email or handle is taken.
    /// - [`RosterError::Validation`](crate::RosterError::Validation) for bad input.
    pub async fn update(&self, id: &str, patch: IndividualPatch) -> Result<TrackedIndividual> {
        let (saved, handle_changed) = {
            let _guard = self.lock(id).await;
            let current = self.store().get_by_id(id).await?;
            let updated = current.patched(patch)?;

            let roster = self.store().get_all().await?;
            if let Some(conflict) = roster.iter().find_map(|r| unique_conflict(r, &updated)) {
                return Err(PersistError::Conflict(conflict).into());
            }

            let handle_changed = updated.codeforces_handle != current.codeforces_handle;
            (self.store().save(&updated).await?, handle_changed)
        };
        tracing::info!(id, handle_changed, "individual updated");

        if !handle_changed {
            return Ok(saved);
        }
        match self.sync_one(id).await {
            Ok(synced) => Ok(synced),
            Err(err) => {
                tracing::warn!(
                    id,
                    stage = %err.stage,
                    error = %err.cause,
                    "resync after handle change failed; keeping edited record"
                );
                Ok(saved)
            }
        }
    }

    /// Remove an individual from the roster.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::NotFound`] (wrapped) for an unknown id.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let _guard = self.lock(id).await;
        self.store().delete(id).await?;
        tracing::info!(id, "individual removed");
        Ok(())
    }
}
