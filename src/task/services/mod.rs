//! Orchestration services for the task lifecycle engine.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleService, TaskServiceError, TaskServiceResult, UploadAttachment,
};
