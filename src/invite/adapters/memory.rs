//! In-memory invite adapters for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::{EmailAddress, UserId};
use crate::invite::{
    domain::{Invite, InviteId, InviteStatus},
    ports::{
        InviteRepository, InviteRepositoryError, InviteRepositoryResult, NotificationDispatcher,
        NotificationError,
    },
};
use crate::project::domain::ProjectId;
use crate::project::ports::{CascadeError, ProjectCascade};

/// Thread-safe in-memory invite repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInviteRepository {
    state: Arc<RwLock<HashMap<InviteId, Invite>>>,
}

impl InMemoryInviteRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> InviteRepositoryError {
    InviteRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl InviteRepository for InMemoryInviteRepository {
    async fn insert(&self, invite: &Invite) -> InviteRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let duplicate = state.values().any(|existing| {
            existing.project() == invite.project()
                && existing.recipient() == invite.recipient()
                && existing.status() == InviteStatus::Pending
        });
        if duplicate {
            return Err(InviteRepositoryError::DuplicatePending {
                project: invite.project(),
                recipient: invite.recipient(),
            });
        }
        state.insert(invite.id(), invite.clone());
        Ok(())
    }

    async fn update(&self, invite: &Invite) -> InviteRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&invite.id()) {
            return Err(InviteRepositoryError::NotFound(invite.id()));
        }
        state.insert(invite.id(), invite.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: InviteId) -> InviteRepositoryResult<Option<Invite>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn pending_exists(
        &self,
        project: ProjectId,
        recipient: UserId,
    ) -> InviteRepositoryResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.values().any(|invite| {
            invite.project() == project
                && invite.recipient() == recipient
                && invite.status() == InviteStatus::Pending
        }))
    }

    async fn list_for_recipient(&self, recipient: UserId) -> InviteRepositoryResult<Vec<Invite>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut invites: Vec<Invite> = state
            .values()
            .filter(|invite| invite.recipient() == recipient)
            .cloned()
            .collect();
        invites.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(invites)
    }

    async fn delete_for_project(&self, project: ProjectId) -> InviteRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.retain(|_, invite| invite.project() != project);
        Ok(())
    }
}

#[async_trait]
impl ProjectCascade for InMemoryInviteRepository {
    async fn delete_for_project(&self, project: ProjectId) -> Result<(), CascadeError> {
        InviteRepository::delete_for_project(self, project)
            .await
            .map_err(|err| CascadeError::new(project, err))
    }
}

/// A dispatched notification captured by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Destination address.
    pub to: EmailAddress,
    /// Rendered subject line.
    pub subject: String,
    /// Rendered body.
    pub body: String,
}

/// Dispatcher that records every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<RwLock<Vec<SentNotification>>>,
}

impl RecordingDispatcher {
    /// Creates a dispatcher with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded notification.
    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotificationError(err.to_string()))?;
        sent.push(SentNotification {
            to: to.clone(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}

/// Dispatcher that fails every send, for exercising the fire-and-forget
/// path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send(
        &self,
        _to: &EmailAddress,
        _subject: &str,
        _body: &str,
    ) -> Result<(), NotificationError> {
        Err(NotificationError("transport unavailable".to_owned()))
    }
}
