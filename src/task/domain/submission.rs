//! Submission, attachment, and comment records.

use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A stored file attached to a submission.
///
/// The task engine only needs a stable retrievable URL and the upload
/// timestamp; the physical medium is the attachment store's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name.
    pub filename: String,
    /// Stable retrieval URL issued by the attachment store.
    pub url: String,
    /// When the file was stored.
    pub uploaded_at: DateTime<Utc>,
}

/// One entry in a task's append-only submissions log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    user: UserId,
    notes: String,
    attachments: Vec<Attachment>,
    created_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a submission record timestamped from the clock.
    #[must_use]
    pub fn new(
        user: UserId,
        notes: impl Into<String>,
        attachments: Vec<Attachment>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            user,
            notes: notes.into(),
            attachments,
            created_at: clock.utc(),
        }
    }

    /// Returns the submitting user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the submission notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns the attached files.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns when the submission was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One entry in a task's append-only comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    user: UserId,
    message: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment timestamped from the clock.
    #[must_use]
    pub fn new(user: UserId, message: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            user,
            message: message.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the commenting user.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the comment text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the comment was posted.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
