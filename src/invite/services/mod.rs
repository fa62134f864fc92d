//! Application services for the invite protocol.

mod protocol;

pub use protocol::{InviteService, InviteServiceError, InviteServiceResult, SendInviteRequest};
