//! Port contracts for task persistence and attachment storage.

pub mod attachments;
pub mod repository;

pub use attachments::{AttachmentStore, AttachmentStoreError, AttachmentStoreResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
