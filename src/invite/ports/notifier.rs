//! Notification dispatcher port for invite delivery.

use crate::identity::domain::EmailAddress;
use async_trait::async_trait;
use thiserror::Error;

/// Sends an out-of-band notification to an email address.
///
/// Invite creation dispatches exactly one message and never retries or
/// rolls back on failure: a lost notification must not lose the invite.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Dispatches a message.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when delivery fails; callers log and
    /// continue.
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}

/// Error returned by notification dispatcher implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification dispatch failed: {0}")]
pub struct NotificationError(pub String);
