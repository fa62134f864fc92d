//! Authenticator port supplying the trusted caller identity.

use crate::error::ErrorKind;
use crate::identity::domain::Caller;
use async_trait::async_trait;
use thiserror::Error;

/// Resolves an inbound credential into a [`Caller`].
///
/// Token format, validity, and expiry are entirely this collaborator's
/// responsibility; the core trusts the resolved identity for every
/// project-scoped authorization decision.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates a credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredential`] when the credential
    /// does not resolve to a known identity.
    async fn authenticate(&self, credential: &str) -> Result<Caller, AuthenticationError>;
}

/// Errors returned by authenticator implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The credential is missing, malformed, or expired.
    #[error("invalid credential")]
    InvalidCredential,
}

impl AuthenticationError {
    /// Classifies the error for transport mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Unauthenticated
    }
}
