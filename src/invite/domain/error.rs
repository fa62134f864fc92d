//! Error types for invite domain validation and state transitions.

use thiserror::Error;

/// Errors returned by invite construction and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InviteDomainError {
    /// Invites may only offer Admin, Member, or Viewer.
    #[error("the Owner role cannot be offered through an invite")]
    OwnerRoleNotOfferable,

    /// The invite already left the Pending state; terminal states admit no
    /// further transitions.
    #[error("invite has already been {0}")]
    AlreadyResolved(super::InviteStatus),
}

/// Error returned while parsing invite statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invite status: {0}")]
pub struct ParseInviteStatusError(pub String);
