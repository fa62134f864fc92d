//! Project aggregate root: role resolution and the guarded membership path.

use super::{
    MemberSpec, Membership, MembershipError, ParseProjectPriorityError, ParseProjectStatusError,
    ProjectDomainError, ProjectId, ProjectRole,
};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work has not begun.
    NotStarted,
    /// Work is underway.
    InProgress,
    /// All work is finished.
    Completed,
    /// Work is paused.
    OnHold,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "on_hold" => Ok(Self::OnHold),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Project planning priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    /// Low priority.
    Low,
    /// Default priority.
    Medium,
    /// High priority.
    High,
}

impl ProjectPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for ProjectPriority {
    type Error = ParseProjectPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseProjectPriorityError(value.to_owned())),
        }
    }
}

/// Parameters for creating a project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectParams {
    /// Project name; must be non-empty after trimming.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The creating user, who becomes the immutable Owner.
    pub created_by: UserId,
    /// Planning start date; defaults to the creation instant when `None`.
    pub start_date: Option<DateTime<Utc>>,
    /// Planning due date.
    pub due_date: DateTime<Utc>,
    /// Planning priority.
    pub priority: ProjectPriority,
}

/// Field-level edit applied by Owner/Admin project updates.
///
/// `None` fields are left unchanged. Membership changes never travel through
/// here; they go through the guarded membership methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectEdit {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement status.
    pub status: Option<ProjectStatus>,
    /// Replacement priority.
    pub priority: Option<ProjectPriority>,
}

/// Project aggregate root.
///
/// Owns the members list and is the only mutation path for it. Invariants
/// held after every mutation:
///
/// - exactly one member has the Owner role and it is `created_by`;
/// - no user appears twice in the members list;
/// - the members list is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    created_by: UserId,
    start_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    status: ProjectStatus,
    priority: ProjectPriority,
    members: Vec<Membership>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted start date.
    pub start_date: DateTime<Utc>,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Persisted priority.
    pub priority: ProjectPriority,
    /// Persisted members list.
    pub members: Vec<Membership>,
    /// Persisted optimistic concurrency token.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project, seeding the creator as its Owner.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is empty
    /// after trimming.
    pub fn create(params: NewProjectParams, clock: &impl Clock) -> Result<Self, ProjectDomainError> {
        let name = params.name.trim().to_owned();
        if name.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: params.description,
            created_by: params.created_by,
            start_date: params.start_date.unwrap_or(timestamp),
            due_date: params.due_date,
            status: ProjectStatus::NotStarted,
            priority: params.priority,
            members: vec![Membership::new(params.created_by, ProjectRole::Owner, clock)],
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            created_by: data.created_by,
            start_date: data.start_date,
            due_date: data.due_date,
            status: data.status,
            priority: data.priority,
            members: data.members,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the planning start date.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the planning due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the delivery status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the planning priority.
    #[must_use]
    pub const fn priority(&self) -> ProjectPriority {
        self.priority
    }

    /// Returns the members list.
    #[must_use]
    pub fn members(&self) -> &[Membership] {
        &self.members
    }

    /// Returns the optimistic concurrency token.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Resolves a user's effective role within this project.
    ///
    /// `created_by` takes precedence over the members list so a corrupted
    /// members entry can never demote the creator. Returns `None` for
    /// non-members; callers treat that as Forbidden for any project-scoped
    /// operation.
    #[must_use]
    pub fn role_of(&self, user: UserId) -> Option<ProjectRole> {
        if user == self.created_by {
            return Some(ProjectRole::Owner);
        }
        self.members
            .iter()
            .find(|member| member.user() == user)
            .map(Membership::role)
    }

    /// Returns `true` when the user is the creator or appears in the
    /// members list.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.role_of(user).is_some()
    }

    /// Returns every participating user id, creator included.
    #[must_use]
    pub fn participant_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.members.iter().map(Membership::user).collect();
        if !ids.contains(&self.created_by) {
            ids.push(self.created_by);
        }
        ids
    }

    /// Adds a member on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// - [`MembershipError::Forbidden`] when the actor is not Owner/Admin.
    /// - [`MembershipError::OwnerRoleNotAssignable`] for `role == Owner`.
    /// - [`MembershipError::AdminGrantRequiresOwner`] when an Admin tries to
    ///   grant the Admin role.
    /// - [`MembershipError::DuplicateMember`] when the target is already a
    ///   member.
    pub fn add_member(
        &mut self,
        actor: UserId,
        target: UserId,
        role: ProjectRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        let actor_role = self.require_manager(actor)?;
        if role == ProjectRole::Owner {
            return Err(MembershipError::OwnerRoleNotAssignable);
        }
        if role == ProjectRole::Admin && actor_role != ProjectRole::Owner {
            return Err(MembershipError::AdminGrantRequiresOwner);
        }
        if self.is_member(target) {
            return Err(MembershipError::DuplicateMember(target));
        }

        self.members.push(Membership::new(target, role, clock));
        self.touch(clock);
        Ok(())
    }

    /// Removes a member on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// - [`MembershipError::Forbidden`] when the actor is not Owner/Admin.
    /// - [`MembershipError::OwnerImmutable`] when the target is the Owner.
    /// - [`MembershipError::MemberNotFound`] when the target is absent.
    pub fn remove_member(
        &mut self,
        actor: UserId,
        target: UserId,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.require_manager(actor)?;
        if target == self.created_by {
            return Err(MembershipError::OwnerImmutable);
        }
        let index = self
            .members
            .iter()
            .position(|member| member.user() == target)
            .ok_or(MembershipError::MemberNotFound(target))?;
        if self
            .members
            .get(index)
            .is_some_and(|member| member.role() == ProjectRole::Owner)
        {
            return Err(MembershipError::OwnerImmutable);
        }

        self.members.remove(index);
        self.touch(clock);
        Ok(())
    }

    /// Changes a member's role on behalf of `actor`.
    ///
    /// Admins may demote between Member and Viewer but only the Owner may
    /// grant Admin; the Owner entry itself is immutable.
    ///
    /// # Errors
    ///
    /// - [`MembershipError::Forbidden`] when the actor is not Owner/Admin.
    /// - [`MembershipError::OwnerImmutable`] when the target is the Owner.
    /// - [`MembershipError::OwnerRoleNotAssignable`] for `new_role == Owner`.
    /// - [`MembershipError::AdminGrantRequiresOwner`] when an Admin tries to
    ///   grant the Admin role.
    /// - [`MembershipError::MemberNotFound`] when the target is absent.
    pub fn change_member_role(
        &mut self,
        actor: UserId,
        target: UserId,
        new_role: ProjectRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        let actor_role = self.require_manager(actor)?;
        if target == self.created_by {
            return Err(MembershipError::OwnerImmutable);
        }
        if new_role == ProjectRole::Owner {
            return Err(MembershipError::OwnerRoleNotAssignable);
        }
        if new_role == ProjectRole::Admin && actor_role != ProjectRole::Owner {
            return Err(MembershipError::AdminGrantRequiresOwner);
        }

        let member = self
            .members
            .iter_mut()
            .find(|member| member.user() == target)
            .ok_or(MembershipError::MemberNotFound(target))?;
        if member.role() == ProjectRole::Owner {
            return Err(MembershipError::OwnerImmutable);
        }
        member.set_role(new_role);
        self.touch(clock);
        Ok(())
    }

    /// Replaces the entire members list on behalf of `actor` (Owner only).
    ///
    /// The payload is normalized defensively: the canonical Owner entry is
    /// always re-injected, duplicate users collapse to their first entry,
    /// and Owner-role requests for other users are coerced to Member. The
    /// §3 invariants therefore hold even when the input violates them.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Forbidden`] when the actor is not the
    /// Owner.
    pub fn replace_members(
        &mut self,
        actor: UserId,
        specs: &[MemberSpec],
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        if self.role_of(actor) != Some(ProjectRole::Owner) {
            return Err(MembershipError::Forbidden);
        }

        let owner_entry = self
            .members
            .iter()
            .find(|member| member.user() == self.created_by)
            .copied()
            .unwrap_or_else(|| Membership::new(self.created_by, ProjectRole::Owner, clock));

        let mut replacement = vec![owner_entry];
        for spec in specs {
            if spec.user == self.created_by
                || replacement.iter().any(|member| member.user() == spec.user)
            {
                continue;
            }
            let role = if spec.role == ProjectRole::Owner {
                ProjectRole::Member
            } else {
                spec.role
            };
            let added_at = self
                .members
                .iter()
                .find(|member| member.user() == spec.user)
                .map(Membership::added_at);
            let entry = added_at.map_or_else(
                || Membership::new(spec.user, role, clock),
                |at| Membership::from_persisted(spec.user, role, at),
            );
            replacement.push(entry);
        }

        self.members = replacement;
        self.touch(clock);
        Ok(())
    }

    /// Admits a user without an acting manager, used by invite acceptance
    /// and creation-time seeding. Idempotent: admitting an existing member
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerRoleNotAssignable`] for
    /// `role == Owner`.
    pub fn admit_member(
        &mut self,
        user: UserId,
        role: ProjectRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        if role == ProjectRole::Owner {
            return Err(MembershipError::OwnerRoleNotAssignable);
        }
        if self.is_member(user) {
            return Ok(());
        }
        self.members.push(Membership::new(user, role, clock));
        self.touch(clock);
        Ok(())
    }

    /// Applies a field-level edit. Authorization (Owner/Admin) is enforced
    /// by the project service before the aggregate is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when a replacement name is
    /// empty after trimming.
    pub fn apply_edit(
        &mut self,
        edit: ProjectEdit,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if let Some(name) = edit.name {
            let trimmed = name.trim().to_owned();
            if trimmed.is_empty() {
                return Err(ProjectDomainError::EmptyName);
            }
            self.name = trimmed;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(due_date) = edit.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = edit.status {
            self.status = status;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        self.touch(clock);
        Ok(())
    }

    /// Resolves the actor's role and requires membership-management rights.
    fn require_manager(&self, actor: UserId) -> Result<ProjectRole, MembershipError> {
        self.role_of(actor)
            .filter(|role| role.can_manage())
            .ok_or(MembershipError::Forbidden)
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    /// Bumps the optimistic concurrency token. Storage adapters call this
    /// when committing a read-modify-write.
    pub(crate) const fn increment_version(&mut self) {
        self.version += 1;
    }
}
