//! Repository port for invite persistence.

use crate::identity::domain::UserId;
use crate::invite::domain::{Invite, InviteId};
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invite repository operations.
pub type InviteRepositoryResult<T> = Result<T, InviteRepositoryError>;

/// Invite persistence contract.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Stores a new invite.
    ///
    /// # Errors
    ///
    /// Returns [`InviteRepositoryError::DuplicatePending`] when a pending
    /// invite already exists for the same project and recipient.
    async fn insert(&self, invite: &Invite) -> InviteRepositoryResult<()>;

    /// Persists changes to an existing invite.
    ///
    /// # Errors
    ///
    /// Returns [`InviteRepositoryError::NotFound`] when the invite does not
    /// exist.
    async fn update(&self, invite: &Invite) -> InviteRepositoryResult<()>;

    /// Finds an invite by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: InviteId) -> InviteRepositoryResult<Option<Invite>>;

    /// Returns `true` when a pending invite exists for the pair.
    async fn pending_exists(
        &self,
        project: ProjectId,
        recipient: UserId,
    ) -> InviteRepositoryResult<bool>;

    /// Returns every invite addressed to the recipient.
    async fn list_for_recipient(&self, recipient: UserId) -> InviteRepositoryResult<Vec<Invite>>;

    /// Deletes every invite referencing the project.
    async fn delete_for_project(&self, project: ProjectId) -> InviteRepositoryResult<()>;
}

/// Errors returned by invite repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InviteRepositoryError {
    /// A pending invite already exists for this project and recipient.
    #[error("a pending invite for this recipient already exists on project {project}")]
    DuplicatePending {
        /// The project already holding a pending invite.
        project: ProjectId,
        /// The recipient of the existing invite.
        recipient: UserId,
    },

    /// The invite was not found.
    #[error("invite not found: {0}")]
    NotFound(InviteId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InviteRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
