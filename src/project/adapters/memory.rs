//! In-memory project repository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository with version-checked updates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<Project> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        if stored.version() != project.version() {
            return Err(ProjectRepositoryError::VersionConflict(project.id()));
        }

        let mut committed = project.clone();
        committed.increment_version();
        state.insert(committed.id(), committed.clone());
        Ok(committed)
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_for_user(&self, user: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut projects: Vec<Project> = state
            .values()
            .filter(|project| project.is_member(user))
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(projects)
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(ProjectRepositoryError::NotFound(id))
    }
}
