//! Service layer for the task lifecycle engine.

use crate::error::ErrorKind;
use crate::identity::domain::Caller;
use crate::project::{
    domain::{Project, ProjectId, ProjectRole},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{
        Assignee, Attachment, NewTaskParams, Task, TaskDomainError, TaskEdit, TaskId, TaskPriority,
        TaskStatus,
    },
    ports::{AttachmentStore, AttachmentStoreError, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project: ProjectId,
    title: String,
    description: String,
    priority: Option<TaskPriority>,
    assignees: Vec<Assignee>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required project and title.
    #[must_use]
    pub fn new(project: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project,
            title: title.into(),
            description: String::new(),
            priority: None,
            assignees: Vec::new(),
            due_date: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the planning priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Seeds the initial assignee list.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = Assignee>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A file upload accompanying a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAttachment {
    /// Original file name.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task's parent project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The caller is not a participant in the task's project.
    #[error("caller lacks the project role required for this task action")]
    Forbidden,

    /// A task rule rejected the mutation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Project repository lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// Attachment storage failed.
    #[error(transparent)]
    Attachments(#[from] AttachmentStoreError),
}

impl TaskServiceError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) | Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => match err {
                TaskRepositoryError::DuplicateTask(_)
                | TaskRepositoryError::VersionConflict(_) => ErrorKind::Conflict,
                TaskRepositoryError::NotFound(_) => ErrorKind::NotFound,
                TaskRepositoryError::Persistence(_) => ErrorKind::Unavailable,
            },
            Self::Projects(err) => match err {
                ProjectRepositoryError::NotFound(_) => ErrorKind::NotFound,
                ProjectRepositoryError::DuplicateProject(_)
                | ProjectRepositoryError::VersionConflict(_) => ErrorKind::Conflict,
                ProjectRepositoryError::Persistence(_) => ErrorKind::Unavailable,
            },
            Self::Attachments(err) => match err {
                AttachmentStoreError::EmptyContent(_) => ErrorKind::InvalidArgument,
                AttachmentStoreError::Storage(_) => ErrorKind::Unavailable,
            },
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle orchestration service.
///
/// Every operation resolves the caller's project role fresh, applies the
/// aggregate's guarded mutation, and commits through the version-checked
/// repository update.
#[derive(Clone)]
pub struct TaskLifecycleService<T, P, A, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    A: AttachmentStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    attachments: Arc<A>,
    clock: Arc<C>,
}

impl<T, P, A, C> TaskLifecycleService<T, P, A, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    A: AttachmentStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, attachments: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            attachments,
            clock,
        }
    }

    /// Creates a task in the `ToDo` state. Viewers cannot create tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the caller is not a
    /// contributing member and [`TaskServiceError::Domain`] when the title
    /// is empty.
    pub async fn create(
        &self,
        caller: Caller,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let project = self.load_project(request.project).await?;
        let role = project
            .role_of(caller.user_id)
            .ok_or(TaskServiceError::Forbidden)?;
        if !role.can_contribute() {
            return Err(TaskServiceError::Forbidden);
        }

        let params = NewTaskParams {
            project: request.project,
            title: request.title,
            description: request.description,
            priority: request.priority.unwrap_or(TaskPriority::Medium),
            assignees: request.assignees,
            due_date: request.due_date,
            created_by: caller.user_id,
        };
        let task = Task::create(params, &*self.clock)?;
        self.tasks.insert(&task).await?;
        Ok(task)
    }

    /// Retrieves a task; project members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when absent and
    /// [`TaskServiceError::Forbidden`] for non-members.
    pub async fn get(&self, caller: Caller, id: TaskId) -> TaskServiceResult<Task> {
        let task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        if !project.is_member(caller.user_id) {
            return Err(TaskServiceError::Forbidden);
        }
        Ok(task)
    }

    /// Lists every task in the project, oldest first; members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-members.
    pub async fn list_for_project(
        &self,
        caller: Caller,
        project_id: ProjectId,
    ) -> TaskServiceResult<Vec<Task>> {
        let project = self.load_project(project_id).await?;
        if !project.is_member(caller.user_id) {
            return Err(TaskServiceError::Forbidden);
        }
        Ok(self.tasks.list_for_project(project_id).await?)
    }

    /// Applies a field-level edit to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the task is terminal or the
    /// caller lacks the rights for the requested change.
    pub async fn update(
        &self,
        caller: Caller,
        id: TaskId,
        edit: TaskEdit,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        let role = self.member_role(&project, caller)?;
        task.apply_edit(caller.user_id, Some(role), edit, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Moves a task between `ToDo` and `InProgress` on behalf of an assignee
    /// or an Owner/Admin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the transition is not
    /// permitted from the current state or by the caller's role.
    pub async fn set_status(
        &self,
        caller: Caller,
        id: TaskId,
        target: TaskStatus,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        let role = self.member_role(&project, caller)?;
        task.set_status(caller.user_id, Some(role), target, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Stores the uploaded files and submits the task for approval.
    ///
    /// Assignment and the at-least-one-attachment rule are checked before
    /// any bytes are stored so failed submissions leave no orphaned blobs.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the caller is not assigned
    /// or no uploads accompany the submission, and
    /// [`TaskServiceError::Attachments`] when storage fails.
    pub async fn submit(
        &self,
        caller: Caller,
        id: TaskId,
        notes: impl Into<String> + Send,
        uploads: Vec<UploadAttachment>,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        self.member_role(&project, caller)?;

        if task.status().is_terminal() {
            return Err(TaskDomainError::TaskImmutable(task.status()).into());
        }
        if !task.is_assigned(caller.user_id) {
            return Err(TaskDomainError::NotAssigned(caller.user_id).into());
        }
        if uploads.is_empty() {
            return Err(TaskDomainError::NoAttachments.into());
        }

        let mut stored: Vec<Attachment> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            stored.push(
                self.attachments
                    .store(&upload.filename, upload.content)
                    .await?,
            );
        }

        task.submit(caller.user_id, notes, stored, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Approves a task awaiting review (Owner/Admin only).
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the caller is not
    /// Owner/Admin or the task is not in review.
    pub async fn approve(&self, caller: Caller, id: TaskId) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        let role = self.member_role(&project, caller)?;
        task.approve(caller.user_id, Some(role), &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Rejects a task awaiting review (Owner/Admin only).
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the caller is not
    /// Owner/Admin or the task is not in review.
    pub async fn reject(&self, caller: Caller, id: TaskId) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        let role = self.member_role(&project, caller)?;
        task.reject(Some(role), &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Appends a comment; any project member, in any task state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-members and
    /// [`TaskServiceError::Domain`] when the message is empty.
    pub async fn add_comment(
        &self,
        caller: Caller,
        id: TaskId,
        message: impl Into<String> + Send,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        self.member_role(&project, caller)?;
        task.add_comment(caller.user_id, message, &*self.clock)?;
        Ok(self.tasks.update(&task).await?)
    }

    /// Deletes a task (project Owner only).
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] for non-Owner callers.
    pub async fn delete(&self, caller: Caller, id: TaskId) -> TaskServiceResult<()> {
        let task = self.load_task(id).await?;
        let project = self.load_project(task.project()).await?;
        if project.role_of(caller.user_id) != Some(ProjectRole::Owner) {
            return Err(TaskServiceError::Forbidden);
        }
        self.tasks.delete(id).await?;
        Ok(())
    }

    /// Resolves the caller's role, rejecting non-members.
    fn member_role(&self, project: &Project, caller: Caller) -> TaskServiceResult<ProjectRole> {
        project
            .role_of(caller.user_id)
            .ok_or(TaskServiceError::Forbidden)
    }

    async fn load_task(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    async fn load_project(&self, id: ProjectId) -> TaskServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::ProjectNotFound(id))
    }
}
