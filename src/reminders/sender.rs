//! Notification delivery contract.

use async_trait::async_trait;

use crate::error::SendError;

/// Outbound notification transport.
///
/// Implementations deliver one message to one address. Delivery mechanics
/// (SMTP, queues, webhooks) live entirely behind this trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver `body` under `subject` to `address`.
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), SendError>;
}

/// Sender that only logs each message. Used when no transport is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSender;

#[async_trait]
impl NotificationSender for TracingSender {
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), SendError> {
        tracing::info!(address, subject, body_len = body.len(), "reminder (log only)");
        Ok(())
    }
}
