//! Repository port for project persistence.

use crate::identity::domain::UserId;
use crate::project::domain::{Project, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Mutations are single-document read-modify-writes: `update` compares the
/// aggregate's version token against the stored one and rejects stale
/// writers, so two concurrent membership changes on the same project
/// serialize instead of silently overwriting each other.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project, enforcing the version token.
    ///
    /// Returns the stored aggregate with its bumped version.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist and [`ProjectRepositoryError::VersionConflict`] when the
    /// caller read a stale copy.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<Project>;

    /// Finds a project by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns every project the user participates in.
    async fn list_for_user(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The caller's copy of the aggregate is stale.
    #[error("concurrent update detected for project {0}")]
    VersionConflict(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
