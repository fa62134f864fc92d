//! Domain model for user identity.
//!
//! Holds the user aggregate, validated contact scalars, and the trusted
//! caller identity every other module authorizes against.

mod error;
mod ids;
mod user;

pub use error::{IdentityDomainError, ParseGlobalRoleError};
pub use ids::{EmailAddress, UserId, Username};
pub use user::{Caller, GlobalRole, PersistedUserData, User, UserProfileEdit};
