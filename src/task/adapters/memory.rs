//! In-memory task adapters for tests and local runs.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::project::domain::ProjectId;
use crate::project::ports::{CascadeError, ProjectCascade};
use crate::task::{
    domain::{Attachment, Task, TaskId},
    ports::{
        AttachmentStore, AttachmentStoreError, AttachmentStoreResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task repository with version-checked updates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.version() != task.version() {
            return Err(TaskRepositoryError::VersionConflict(task.id()));
        }

        let mut committed = task.clone();
        committed.increment_version();
        state.insert(committed.id(), committed.clone());
        Ok(committed)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn list_for_project(&self, project: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .values()
            .filter(|task| task.project() == project)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn delete_for_project(&self, project: ProjectId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.retain(|_, task| task.project() != project);
        Ok(())
    }
}

#[async_trait]
impl ProjectCascade for InMemoryTaskRepository {
    async fn delete_for_project(&self, project: ProjectId) -> Result<(), CascadeError> {
        TaskRepository::delete_for_project(self, project)
            .await
            .map_err(|err| CascadeError::new(project, err))
    }
}

/// In-memory attachment store issuing `memory://` retrieval URLs.
#[derive(Debug, Clone)]
pub struct InMemoryAttachmentStore<C: Clock> {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    clock: Arc<C>,
}

impl<C: Clock> InMemoryAttachmentStore<C> {
    /// Creates an empty in-memory attachment store.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Retrieves stored content by its `memory://` URL.
    #[must_use]
    pub fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .ok()
            .and_then(|blobs| blobs.get(url).cloned())
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> AttachmentStore for InMemoryAttachmentStore<C> {
    async fn store(&self, filename: &str, content: Vec<u8>) -> AttachmentStoreResult<Attachment> {
        if content.is_empty() {
            return Err(AttachmentStoreError::EmptyContent(filename.to_owned()));
        }
        let url = format!("memory://{}/{filename}", Uuid::new_v4());
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| AttachmentStoreError::storage(std::io::Error::other(err.to_string())))?;
        blobs.insert(url.clone(), content);
        Ok(Attachment {
            filename: filename.to_owned(),
            url,
            uploaded_at: self.clock.utc(),
        })
    }
}
