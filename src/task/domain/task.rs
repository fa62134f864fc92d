//! Task aggregate root and its lifecycle state machine.

use super::{
    Attachment, Comment, ParseTaskPriorityError, ParseTaskStatusError, Submission,
    TaskDomainError, TaskId,
};
use crate::identity::domain::UserId;
use crate::project::domain::{ProjectId, ProjectRole};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
///
/// `Approved` and `Rejected` are terminal: nothing but comments may change
/// on a task once it reaches either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    ToDo,
    /// Work is underway.
    InProgress,
    /// A submission is awaiting Owner/Admin review.
    SubjectForApproval,
    /// Reviewed and accepted.
    Approved,
    /// Reviewed and rejected.
    Rejected,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::SubjectForApproval => "subject_for_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` when no further lifecycle transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns `true` for states assignees may set directly.
    #[must_use]
    pub const fn is_settable(self) -> bool {
        matches!(self, Self::ToDo | Self::InProgress)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "to_do" => Ok(Self::ToDo),
            "in_progress" => Ok(Self::InProgress),
            "subject_for_approval" => Ok(Self::SubjectForApproval),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task planning priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Default priority.
    Medium,
    /// High priority.
    High,
    /// Needs immediate attention.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Canonical `{user, role}` assignee shape.
///
/// Boundary adapters normalize looser payloads (bare ids, `{userId}`
/// objects) into this before the aggregate sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// The assigned user.
    pub user: UserId,
    /// The role the assignment was made under.
    pub role: ProjectRole,
}

impl Assignee {
    /// Creates an assignee entry.
    #[must_use]
    pub const fn new(user: UserId, role: ProjectRole) -> Self {
        Self { user, role }
    }
}

/// Parameters for creating a task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskParams {
    /// Parent project.
    pub project: ProjectId,
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Planning priority.
    pub priority: TaskPriority,
    /// Initial assignees; duplicates collapse to the first entry.
    pub assignees: Vec<Assignee>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// The creating user.
    pub created_by: UserId,
}

/// Field-level edit applied through the task service.
///
/// `None` fields are left unchanged. Reassignment (`assignees`) is
/// restricted to Owner/Admin actors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement assignee list.
    pub assignees: Option<Vec<Assignee>>,
}

/// Task aggregate root, scoped to one project.
///
/// Invariant: `approved_by` is set if and only if the status is
/// [`TaskStatus::Approved`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    title: String,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    assignees: Vec<Assignee>,
    submissions: Vec<Submission>,
    comments: Vec<Comment>,
    approved_by: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    created_by: UserId,
    completed_at: Option<DateTime<Utc>>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted parent project.
    pub project: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted lifecycle state.
    pub status: TaskStatus,
    /// Persisted assignees.
    pub assignees: Vec<Assignee>,
    /// Persisted submissions log.
    pub submissions: Vec<Submission>,
    /// Persisted comment thread.
    pub comments: Vec<Comment>,
    /// Persisted approver, if any.
    pub approved_by: Option<UserId>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted optimistic concurrency token.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in the initial `ToDo` state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty after
    /// trimming.
    pub fn create(params: NewTaskParams, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = params.title.trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project: params.project,
            title,
            description: params.description,
            priority: params.priority,
            status: TaskStatus::ToDo,
            assignees: dedupe_assignees(params.assignees),
            submissions: Vec::new(),
            comments: Vec::new(),
            approved_by: None,
            due_date: params.due_date,
            created_by: params.created_by,
            completed_at: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            assignees: data.assignees,
            submissions: data.submissions,
            comments: data.comments,
            approved_by: data.approved_by,
            due_date: data.due_date,
            created_by: data.created_by,
            completed_at: data.completed_at,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the planning priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee list.
    #[must_use]
    pub fn assignees(&self) -> &[Assignee] {
        &self.assignees
    }

    /// Returns the append-only submissions log.
    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Returns the append-only comment thread.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the approving user, set exactly when the task is Approved.
    #[must_use]
    pub const fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns when work was submitted for approval, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
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

    /// Returns `true` when the user appears in the assignee list.
    #[must_use]
    pub fn is_assigned(&self, user: UserId) -> bool {
        self.assignees.iter().any(|assignee| assignee.user == user)
    }

    /// Moves the task between the directly settable states (`ToDo`,
    /// `InProgress`) on behalf of an assignee or an Owner/Admin.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::TaskImmutable`] when the current state is not
    ///   directly settable (in review or terminal).
    /// - [`TaskDomainError::StatusNotSettable`] when the target is only
    ///   reachable through submit/approve/reject.
    /// - [`TaskDomainError::Forbidden`] when the actor is neither assigned
    ///   nor Owner/Admin.
    pub fn set_status(
        &mut self,
        actor: UserId,
        actor_role: Option<ProjectRole>,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.is_settable() {
            return Err(TaskDomainError::TaskImmutable(self.status));
        }
        if !target.is_settable() {
            return Err(TaskDomainError::StatusNotSettable(target));
        }
        if !self.is_assigned(actor) && !actor_role.is_some_and(ProjectRole::can_manage) {
            return Err(TaskDomainError::Forbidden);
        }

        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Records a submission and moves the task into review.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::TaskImmutable`] when the task is terminal.
    /// - [`TaskDomainError::NotAssigned`] when the submitter is not in the
    ///   assignee list.
    /// - [`TaskDomainError::NoAttachments`] when no attachment accompanies
    ///   the submission.
    pub fn submit(
        &mut self,
        actor: UserId,
        notes: impl Into<String>,
        attachments: Vec<Attachment>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TaskImmutable(self.status));
        }
        if !self.is_assigned(actor) {
            return Err(TaskDomainError::NotAssigned(actor));
        }
        if attachments.is_empty() {
            return Err(TaskDomainError::NoAttachments);
        }

        self.submissions
            .push(Submission::new(actor, notes, attachments, clock));
        self.status = TaskStatus::SubjectForApproval;
        self.completed_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Approves a task awaiting review (Owner/Admin only).
    ///
    /// Re-approving an already Approved task fails rather than silently
    /// succeeding.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::Forbidden`] when the actor is not Owner/Admin.
    /// - [`TaskDomainError::NotAwaitingApproval`] when the task is not in
    ///   review.
    pub fn approve(
        &mut self,
        actor: UserId,
        actor_role: Option<ProjectRole>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_reviewer(actor_role)?;
        self.status = TaskStatus::Approved;
        self.approved_by = Some(actor);
        self.touch(clock);
        Ok(())
    }

    /// Rejects a task awaiting review (Owner/Admin only).
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::Forbidden`] when the actor is not Owner/Admin.
    /// - [`TaskDomainError::NotAwaitingApproval`] when the task is not in
    ///   review.
    pub fn reject(
        &mut self,
        actor_role: Option<ProjectRole>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_reviewer(actor_role)?;
        self.status = TaskStatus::Rejected;
        self.touch(clock);
        Ok(())
    }

    /// Appends a comment. Permitted in every state, terminal included;
    /// project-membership authorization happens in the service.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyComment`] when the message is empty
    /// after trimming.
    pub fn add_comment(
        &mut self,
        actor: UserId,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let text = message.into();
        if text.trim().is_empty() {
            return Err(TaskDomainError::EmptyComment);
        }
        self.comments.push(Comment::new(actor, text, clock));
        self.touch(clock);
        Ok(())
    }

    /// Applies a field-level edit on behalf of the actor.
    ///
    /// Terminal tasks are immutable except for comments. Reassignment
    /// requires Owner/Admin; other fields may be edited by Owner/Admin, an
    /// assignee, or the task's creator.
    ///
    /// # Errors
    ///
    /// - [`TaskDomainError::TaskImmutable`] when the task is terminal.
    /// - [`TaskDomainError::Forbidden`] when the actor lacks the rights for
    ///   the requested change.
    /// - [`TaskDomainError::EmptyTitle`] when a replacement title is empty.
    pub fn apply_edit(
        &mut self,
        actor: UserId,
        actor_role: Option<ProjectRole>,
        edit: TaskEdit,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TaskImmutable(self.status));
        }

        let is_manager = actor_role.is_some_and(ProjectRole::can_manage);
        if edit.assignees.is_some() && !is_manager {
            return Err(TaskDomainError::Forbidden);
        }
        if !is_manager && !self.is_assigned(actor) && self.created_by != actor {
            return Err(TaskDomainError::Forbidden);
        }

        if let Some(title) = edit.title {
            let trimmed = title.trim().to_owned();
            if trimmed.is_empty() {
                return Err(TaskDomainError::EmptyTitle);
            }
            self.title = trimmed;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(priority) = edit.priority {
            self.priority = priority;
        }
        if let Some(due_date) = edit.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(assignees) = edit.assignees {
            self.assignees = dedupe_assignees(assignees);
        }
        self.touch(clock);
        Ok(())
    }

    /// Requires an Owner/Admin actor and a task in review.
    fn require_reviewer(&self, actor_role: Option<ProjectRole>) -> Result<(), TaskDomainError> {
        if !actor_role.is_some_and(ProjectRole::can_manage) {
            return Err(TaskDomainError::Forbidden);
        }
        if self.status != TaskStatus::SubjectForApproval {
            return Err(TaskDomainError::NotAwaitingApproval(self.status));
        }
        Ok(())
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

/// Collapses duplicate users to their first assignee entry.
fn dedupe_assignees(assignees: Vec<Assignee>) -> Vec<Assignee> {
    let mut unique: Vec<Assignee> = Vec::with_capacity(assignees.len());
    for assignee in assignees {
        if !unique.iter().any(|existing| existing.user == assignee.user) {
            unique.push(assignee);
        }
    }
    unique
}
