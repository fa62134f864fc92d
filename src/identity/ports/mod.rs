//! Port contracts for identity management.

pub mod authenticator;
pub mod store;

pub use authenticator::{AuthenticationError, Authenticator};
pub use store::{IdentityStore, IdentityStoreError, IdentityStoreResult};
