//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The username is empty or contains whitespace.
    #[error("invalid username '{0}'")]
    InvalidUsername(String),

    /// The display name is empty after trimming.
    #[error("full name must not be empty")]
    EmptyFullName,
}

/// Error returned while parsing global roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown global role: {0}")]
pub struct ParseGlobalRoleError(pub String);
