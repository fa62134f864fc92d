//! Crate-wide error classification.
//!
//! Every service-level error maps onto one of these kinds so callers at the
//! operation boundary can translate failures into a structured outcome
//! (kind + message) without matching on module-specific variants.

use serde::{Deserialize, Serialize};

/// Classification of an operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No valid caller identity accompanied the request.
    Unauthenticated,
    /// The caller identity is valid but lacks the role for the action.
    Forbidden,
    /// A referenced project, task, invite, or user does not exist.
    NotFound,
    /// The mutation collides with existing state (duplicate invite,
    /// duplicate member, stale version token).
    Conflict,
    /// A required field is missing or an argument value is not permitted.
    InvalidArgument,
    /// The transition is not permitted from the aggregate's current state.
    InvalidState,
    /// A collaborator (storage, attachment store) failed transiently.
    Unavailable,
}

impl ErrorKind {
    /// Returns the canonical string form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidState => "invalid_state",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
