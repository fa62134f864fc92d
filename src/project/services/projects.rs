//! Service layer for project CRUD and deletion cascades.

use crate::error::ErrorKind;
use crate::identity::domain::Caller;
use crate::project::{
    domain::{
        MemberSpec, MembershipError, NewProjectParams, Project, ProjectDomainError, ProjectEdit,
        ProjectId, ProjectPriority, ProjectRole,
    },
    ports::{CascadeError, ProjectCascade, ProjectRepository, ProjectRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
    due_date: Option<DateTime<Utc>>,
    start_date: Option<DateTime<Utc>>,
    priority: Option<ProjectPriority>,
    members: Vec<MemberSpec>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            due_date: None,
            start_date: None,
            priority: None,
            members: Vec::new(),
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the required due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the planning start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the planning priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: ProjectPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Seeds additional members alongside the Owner.
    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = MemberSpec>) -> Self {
        self.members = members.into_iter().collect();
        self
    }
}

/// Request payload for updating project fields and, optionally, wholesale
/// replacing the members list (Owner only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    /// Field edits; `None` fields are untouched.
    pub edit: ProjectEdit,
    /// Replacement members payload, normalized through the aggregate's
    /// Owner-only bulk path when present.
    pub members: Option<Vec<MemberSpec>>,
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The caller lacks the project role required for the action.
    #[error("caller lacks the project role required for this action")]
    Forbidden,

    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// A membership rule rejected the mutation.
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// A dependent-record cascade failed after project deletion.
    #[error(transparent)]
    Cascade(#[from] CascadeError),
}

impl ProjectServiceError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::Membership(err) => err.kind(),
            Self::Repository(err) => match err {
                ProjectRepositoryError::DuplicateProject(_)
                | ProjectRepositoryError::VersionConflict(_) => ErrorKind::Conflict,
                ProjectRepositoryError::NotFound(_) => ErrorKind::NotFound,
                ProjectRepositoryError::Persistence(_) => ErrorKind::Unavailable,
            },
            Self::Cascade(_) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project CRUD orchestration service.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cascades: Vec<Arc<dyn ProjectCascade>>,
    clock: Arc<C>,
}

impl<R, C> ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service with no deletion cascades.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            cascades: Vec::new(),
            clock,
        }
    }

    /// Registers a cascade to run after project deletion.
    #[must_use]
    pub fn with_cascade(mut self, cascade: Arc<dyn ProjectCascade>) -> Self {
        self.cascades.push(cascade);
        self
    }

    /// Creates a project with the caller as its Owner.
    ///
    /// Seed members are normalized: the creator is skipped (the Owner entry
    /// already covers them) and Owner-role requests are coerced to Member.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the name is empty or the
    /// due date is missing.
    pub async fn create(
        &self,
        caller: Caller,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let due_date = request
            .due_date
            .ok_or(ProjectDomainError::MissingDueDate)?;
        let params = NewProjectParams {
            name: request.name,
            description: request.description,
            created_by: caller.user_id,
            start_date: request.start_date,
            due_date,
            priority: request.priority.unwrap_or(ProjectPriority::Medium),
        };
        let mut project = Project::create(params, &*self.clock)?;

        for spec in request.members {
            let role = if spec.role == ProjectRole::Owner {
                ProjectRole::Member
            } else {
                spec.role
            };
            project.admit_member(spec.user, role, &*self.clock)?;
        }

        self.repository.insert(&project).await?;
        Ok(project)
    }

    /// Retrieves a project; members only.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] when absent and
    /// [`ProjectServiceError::Forbidden`] for non-members.
    pub async fn get(&self, caller: Caller, id: ProjectId) -> ProjectServiceResult<Project> {
        let project = self.load(id).await?;
        if !project.is_member(caller.user_id) {
            return Err(ProjectServiceError::Forbidden);
        }
        Ok(project)
    }

    /// Lists every project the caller participates in.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_for_user(&self, caller: Caller) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.repository.list_for_user(caller.user_id).await?)
    }

    /// Updates project fields (Owner/Admin) and, when a members payload is
    /// present, replaces the members list (Owner only).
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] when the caller is not
    /// Owner/Admin, [`ProjectServiceError::Membership`] when the members
    /// payload is rejected, and [`ProjectServiceError::Repository`] with a
    /// version conflict when a concurrent writer won.
    pub async fn update(
        &self,
        caller: Caller,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(id).await?;
        let role = project
            .role_of(caller.user_id)
            .ok_or(ProjectServiceError::Forbidden)?;
        if !role.can_manage() {
            return Err(ProjectServiceError::Forbidden);
        }

        project.apply_edit(request.edit, &*self.clock)?;
        if let Some(members) = request.members {
            project.replace_members(caller.user_id, &members, &*self.clock)?;
        }

        Ok(self.repository.update(&project).await?)
    }

    /// Deletes a project (Owner only), then cascades deletion of dependent
    /// invites and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] for non-Owner callers and
    /// [`ProjectServiceError::Cascade`] when a dependent store fails after
    /// the project document is gone.
    pub async fn delete(&self, caller: Caller, id: ProjectId) -> ProjectServiceResult<()> {
        let project = self.load(id).await?;
        if project.role_of(caller.user_id) != Some(ProjectRole::Owner) {
            return Err(ProjectServiceError::Forbidden);
        }

        self.repository.delete(id).await?;
        for cascade in &self.cascades {
            cascade.delete_for_project(id).await?;
        }
        Ok(())
    }

    async fn load(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }
}
