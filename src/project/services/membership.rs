//! Service layer for the membership mutation protocol.

use super::{ProjectServiceError, ProjectServiceResult};
use crate::identity::domain::{Caller, UserId};
use crate::project::{
    domain::{Project, ProjectId, ProjectRole},
    ports::ProjectRepository,
};
use mockable::Clock;
use std::sync::Arc;

/// Membership mutation service.
///
/// Thin orchestration over the aggregate's guarded methods: load the fresh
/// project, apply the mutation, and commit through the version-checked
/// repository update so concurrent member changes serialize.
#[derive(Clone)]
pub struct MembershipService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> MembershipService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Adds `target` to the project with the given role.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Membership`] when a membership rule
    /// rejects the mutation and [`ProjectServiceError::Repository`] with a
    /// version conflict when a concurrent writer won.
    pub async fn add_member(
        &self,
        caller: Caller,
        project_id: ProjectId,
        target: UserId,
        role: ProjectRole,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(project_id).await?;
        project.add_member(caller.user_id, target, role, &*self.clock)?;
        Ok(self.repository.update(&project).await?)
    }

    /// Removes `target` from the project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Membership`] when the target is the
    /// Owner or not a member, or when the caller is not Owner/Admin.
    pub async fn remove_member(
        &self,
        caller: Caller,
        project_id: ProjectId,
        target: UserId,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(project_id).await?;
        project.remove_member(caller.user_id, target, &*self.clock)?;
        Ok(self.repository.update(&project).await?)
    }

    /// Changes `target`'s role.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Membership`] when the caller is not
    /// Owner/Admin, when an Admin attempts to grant Admin, or when the
    /// target is the Owner.
    pub async fn change_member_role(
        &self,
        caller: Caller,
        project_id: ProjectId,
        target: UserId,
        new_role: ProjectRole,
    ) -> ProjectServiceResult<Project> {
        let mut project = self.load(project_id).await?;
        project.change_member_role(caller.user_id, target, new_role, &*self.clock)?;
        Ok(self.repository.update(&project).await?)
    }

    async fn load(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }
}
