//! Error types for project domain validation and membership rules.

use crate::error::ErrorKind;
use crate::identity::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,

    /// A due date was not supplied at creation.
    #[error("project due date is required")]
    MissingDueDate,
}

/// Errors returned by the guarded membership mutation path.
///
/// Every membership change goes through the [`Project`] aggregate's guarded
/// methods, so these variants are the single source of membership-rule
/// failures.
///
/// [`Project`]: super::Project
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipError {
    /// The actor is not an Owner or Admin of the project.
    #[error("only the project Owner or an Admin may manage members")]
    Forbidden,

    /// Granting the Admin role is reserved for the Owner.
    #[error("only the project Owner may grant the Admin role")]
    AdminGrantRequiresOwner,

    /// The target user is already a member.
    #[error("user {0} is already a member of this project")]
    DuplicateMember(UserId),

    /// The Owner role can only be held by the project creator.
    #[error("the Owner role cannot be assigned")]
    OwnerRoleNotAssignable,

    /// The Owner entry cannot be removed, demoted, or reassigned.
    #[error("the project Owner cannot be removed or demoted")]
    OwnerImmutable,

    /// The target user is not a member of the project.
    #[error("user {0} is not a member of this project")]
    MemberNotFound(UserId),
}

impl MembershipError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden | Self::AdminGrantRequiresOwner => ErrorKind::Forbidden,
            Self::DuplicateMember(_) => ErrorKind::Conflict,
            Self::OwnerRoleNotAssignable => ErrorKind::InvalidArgument,
            Self::OwnerImmutable => ErrorKind::InvalidState,
            Self::MemberNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Error returned while parsing project statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing project priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project priority: {0}")]
pub struct ParseProjectPriorityError(pub String);

/// Error returned while parsing project roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project role: {0}")]
pub struct ParseProjectRoleError(pub String);
