//! Error types for task domain validation and lifecycle transitions.

use super::TaskStatus;
use crate::error::ErrorKind;
use crate::identity::domain::UserId;
use thiserror::Error;

/// Errors returned by task construction and lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A comment message is empty after trimming.
    #[error("comment message must not be empty")]
    EmptyComment,

    /// A submission carried no attachments.
    #[error("a submission requires at least one attachment")]
    NoAttachments,

    /// The caller lacks the project role required for the action.
    #[error("caller lacks the project role required for this task action")]
    Forbidden,

    /// The caller is not in the task's assignee list.
    #[error("user {0} is not assigned to this task")]
    NotAssigned(UserId),

    /// The requested status cannot be set directly; it is only reachable
    /// through submit/approve/reject.
    #[error("status '{}' cannot be set directly", .0.as_str())]
    StatusNotSettable(TaskStatus),

    /// The task's current state admits no such mutation.
    #[error("task is {} and cannot be modified", .0.as_str())]
    TaskImmutable(TaskStatus),

    /// Approval or rejection was requested outside review.
    #[error("task is {} and is not awaiting approval", .0.as_str())]
    NotAwaitingApproval(TaskStatus),
}

impl TaskDomainError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle | Self::EmptyComment | Self::NoAttachments
            | Self::StatusNotSettable(_) => ErrorKind::InvalidArgument,
            Self::Forbidden | Self::NotAssigned(_) => ErrorKind::Forbidden,
            Self::TaskImmutable(_) | Self::NotAwaitingApproval(_) => ErrorKind::InvalidState,
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
