//! Invite aggregate and its two-transition state machine.

use super::{InviteDomainError, ParseInviteStatusError};
use crate::identity::domain::UserId;
use crate::project::domain::{ProjectId, ProjectRole};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an invite record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteId(Uuid);

impl InviteId {
    /// Creates a new random invite identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an invite identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for InviteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InviteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invite lifecycle state.
///
/// `Pending` is the only state admitting a transition; `Accepted` and
/// `Declined` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    /// Awaiting the recipient's response.
    Pending,
    /// The recipient accepted; membership was granted.
    Accepted,
    /// The recipient declined.
    Declined,
}

impl InviteStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Returns `true` when no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }
}

impl TryFrom<&str> for InviteStatus {
    type Error = ParseInviteStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseInviteStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recipient's response to a pending invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteAction {
    /// Accept the offered membership.
    Accept,
    /// Decline the offer.
    Decline,
}

/// Invite aggregate: a pending or resolved offer of project membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    id: InviteId,
    project: ProjectId,
    sender: UserId,
    recipient: UserId,
    role: ProjectRole,
    status: InviteStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInviteData {
    /// Persisted invite identifier.
    pub id: InviteId,
    /// Persisted project reference.
    pub project: ProjectId,
    /// Persisted sender.
    pub sender: UserId,
    /// Persisted recipient.
    pub recipient: UserId,
    /// Persisted offered role.
    pub role: ProjectRole,
    /// Persisted lifecycle state.
    pub status: InviteStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// Creates a pending invite offering `role` on the project.
    ///
    /// # Errors
    ///
    /// Returns [`InviteDomainError::OwnerRoleNotOfferable`] when the offered
    /// role is Owner.
    pub fn new(
        project: ProjectId,
        sender: UserId,
        recipient: UserId,
        role: ProjectRole,
        clock: &impl Clock,
    ) -> Result<Self, InviteDomainError> {
        if role == ProjectRole::Owner {
            return Err(InviteDomainError::OwnerRoleNotOfferable);
        }
        Ok(Self {
            id: InviteId::new(),
            project,
            sender,
            recipient,
            role,
            status: InviteStatus::Pending,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs an invite from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedInviteData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            sender: data.sender,
            recipient: data.recipient,
            role: data.role,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the invite identifier.
    #[must_use]
    pub const fn id(&self) -> InviteId {
        self.id
    }

    /// Returns the project being offered.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the sending user.
    #[must_use]
    pub const fn sender(&self) -> UserId {
        self.sender
    }

    /// Returns the invited user.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the offered role.
    #[must_use]
    pub const fn role(&self) -> ProjectRole {
        self.role
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> InviteStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies the recipient's response.
    ///
    /// # Errors
    ///
    /// Returns [`InviteDomainError::AlreadyResolved`] when the invite is no
    /// longer pending.
    pub const fn resolve(&mut self, action: InviteAction) -> Result<(), InviteDomainError> {
        if self.status.is_terminal() {
            return Err(InviteDomainError::AlreadyResolved(self.status));
        }
        self.status = match action {
            InviteAction::Accept => InviteStatus::Accepted,
            InviteAction::Decline => InviteStatus::Declined,
        };
        Ok(())
    }
}

/// Unauthenticated invite preview.
///
/// Returned without a caller identity so an invitee can see the offer
/// before logging in. Deliberately limited to display names, the project
/// name, the offered role, and the status; nothing else leaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitePreview {
    /// The invite identifier.
    pub id: InviteId,
    /// Name of the project being offered.
    pub project_name: String,
    /// The offered role.
    pub role: ProjectRole,
    /// Display name of the sender.
    pub sender_name: String,
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Current lifecycle state.
    pub status: InviteStatus,
}
