//! Cascade port invoked when a project is deleted.

use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Receives project-deletion notifications so dependent records (invites,
/// tasks) can be removed with the aggregate.
///
/// Implemented by the invite and task repositories; the project service
/// fans deletion out to every registered cascade after the project document
/// is gone.
#[async_trait]
pub trait ProjectCascade: Send + Sync {
    /// Deletes every record owned by or referencing the project.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError`] when the dependent store fails.
    async fn delete_for_project(&self, project: ProjectId) -> Result<(), CascadeError>;
}

/// Error returned by cascade implementations.
#[derive(Debug, Clone, Error)]
#[error("cascade deletion failed for project {project}: {source}")]
pub struct CascadeError {
    /// The project being cascaded.
    pub project: ProjectId,
    /// The underlying store failure.
    pub source: Arc<dyn std::error::Error + Send + Sync>,
}

impl CascadeError {
    /// Wraps a dependent-store failure.
    pub fn new(project: ProjectId, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            project,
            source: Arc::new(err),
        }
    }
}
