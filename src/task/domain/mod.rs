//! Domain types for the task lifecycle engine.

mod error;
mod ids;
mod submission;
mod task;

pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use submission::{Attachment, Comment, Submission};
pub use task::{Assignee, NewTaskParams, PersistedTaskData, Task, TaskEdit, TaskPriority, TaskStatus};
