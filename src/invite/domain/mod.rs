//! Domain model for the invite protocol.

mod error;
mod invite;

pub use error::{InviteDomainError, ParseInviteStatusError};
pub use invite::{
    Invite, InviteAction, InviteId, InvitePreview, InviteStatus, PersistedInviteData,
};
