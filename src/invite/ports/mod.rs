//! Port contracts for invite persistence and notification dispatch.

pub mod notifier;
pub mod repository;

pub use notifier::{NotificationDispatcher, NotificationError};
pub use repository::{InviteRepository, InviteRepositoryError, InviteRepositoryResult};
