//! Sending reminders to inactive individuals and recording them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::message::compose;
use super::scanner::find_due;
use super::sender::NotificationSender;
use crate::config::ReminderConfig;
use crate::error::PersistError;
use crate::model::TrackedIndividual;
use crate::store::RecordStore;
use crate::sync::RecordLocks;

/// Where a single reminder went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStage {
    Send,
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderFailure {
    pub id: String,
    pub address: String,
    pub stage: ReminderStage,
    pub error: String,
}

/// Outcome of one reminder pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReport {
    /// Individuals found due.
    pub attempted: usize,
    /// Reminders delivered and counted on the record.
    pub sent: usize,
    pub failures: Vec<ReminderFailure>,
}

/// Sends reminders to every due individual through a [`NotificationSender`].
///
/// `locks` must be the same instance the [`SyncOrchestrator`](crate::SyncOrchestrator)
/// holds, otherwise a concurrent sync can overwrite a recorded reminder.
pub struct ReminderDispatcher {
    store: Arc<dyn RecordStore>,
    sender: Arc<dyn NotificationSender>,
    config: ReminderConfig,
    locks: Arc<RecordLocks>,
}

impl ReminderDispatcher {
    pub fn new(
        store: Arc<dyn RecordStore>,
        sender: Arc<dyn NotificationSender>,
        config: ReminderConfig,
        locks: Arc<RecordLocks>,
    ) -> Self {
        Self {
            store,
            sender,
            config,
            locks,
        }
    }

    /// Individuals due for a reminder at `now`. Read-only.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the roster cannot be read.
    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<TrackedIndividual>, PersistError> {
        let roster = self.store.get_all().await?;
        Ok(find_due(&roster, self.config.window_days, now)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Remind every due individual once.
    ///
    /// Each delivered reminder increments the individual's
    /// `reminder_emails_sent` and is saved immediately. A failed send leaves
    /// the count untouched. Failures are isolated per individual.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] only if the roster cannot be read.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReminderReport, PersistError> {
        let due = self.due(now).await?;
        let mut report = ReminderReport {
            attempted: due.len(),
            ..ReminderReport::default()
        };

        for individual in &due {
            match self.remind(individual).await {
                Ok(()) => report.sent += 1,
                Err(failure) => {
                    tracing::warn!(
                        id = %failure.id,
                        stage = ?failure.stage,
                        error = %failure.error,
                        "reminder failed"
                    );
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            due = report.attempted,
            sent = report.sent,
            failed = report.failures.len(),
            "reminder pass finished"
        );
        Ok(report)
    }

    async fn remind(&self, individual: &TrackedIndividual) -> Result<(), ReminderFailure> {
        let failure = |stage, error: String| ReminderFailure {
            id: individual.id.clone(),
            address: individual.email.clone(),
            stage,
            error,
        };

        let message = compose(individual, &self.config);
        self.sender
            .send(&individual.email, &message.subject, &message.body)
            .await
            .map_err(|e| failure(ReminderStage::Send, e.to_string()))?;

        // Held across re-read and save so an in-flight sync finishes first.
        let _guard = self.locks.acquire(&individual.id).await;
        let mut current = self
            .store
            .get_by_id(&individual.id)
            .await
            .map_err(|e| failure(ReminderStage::Record, e.to_string()))?;
        current.reminder_emails_sent += 1;
        self.store
            .save(&current)
            .await
            .map_err(|e| failure(ReminderStage::Record, e.to_string()))?;

        tracing::debug!(
            id = %current.id,
            total = current.reminder_emails_sent,
            "reminder recorded"
        );
        Ok(())
    }
}
