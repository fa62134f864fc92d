//! Service layer for the invite protocol: send, respond, preview, search.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{Caller, EmailAddress, IdentityDomainError, User, UserId},
    ports::{IdentityStore, IdentityStoreError},
};
use crate::invite::{
    domain::{Invite, InviteAction, InviteDomainError, InviteId, InvitePreview},
    ports::{InviteRepository, InviteRepositoryError, NotificationDispatcher},
};
use crate::project::{
    domain::{MembershipError, Project, ProjectId, ProjectRole},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use minijinja::{Environment, context};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Maximum number of users returned by candidate search.
const SEARCH_RESULT_LIMIT: usize = 10;

const INVITE_SUBJECT_TEMPLATE: &str =
    r#"You're invited to join project "{{ project_name }}""#;

const INVITE_BODY_TEMPLATE: &str = r#"<h3>You've been invited to join "{{ project_name }}"</h3>
<p>{{ sender_name }} has invited you to collaborate as {{ role }}.</p>
<p><a href="{{ invite_link }}">Accept invite</a></p>"#;

/// Request payload for sending an invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendInviteRequest {
    project: ProjectId,
    recipient_email: String,
    role: Option<ProjectRole>,
}

impl SendInviteRequest {
    /// Creates a request offering the default Viewer role.
    #[must_use]
    pub fn new(project: ProjectId, recipient_email: impl Into<String>) -> Self {
        Self {
            project,
            recipient_email: recipient_email.into(),
            role: None,
        }
    }

    /// Sets the offered role.
    #[must_use]
    pub const fn with_role(mut self, role: ProjectRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Service-level errors for invite operations.
#[derive(Debug, Error)]
pub enum InviteServiceError {
    /// The referenced invite does not exist.
    #[error("invite not found: {0}")]
    InviteNotFound(InviteId),

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// No user is registered under the recipient address.
    #[error("no user registered for {0}")]
    RecipientNotFound(EmailAddress),

    /// The caller is not an Owner or Admin of the project.
    #[error("only the project Owner or an Admin may send invites")]
    NotManager,

    /// Only the invited user may respond to an invite.
    #[error("only the invite recipient may respond")]
    NotRecipient,

    /// The recipient already belongs to the project.
    #[error("user {0} is already a member of this project")]
    AlreadyMember(UserId),

    /// Invite construction or transition failed.
    #[error(transparent)]
    Domain(#[from] InviteDomainError),

    /// The recipient email failed validation.
    #[error(transparent)]
    Email(#[from] IdentityDomainError),

    /// Membership admission failed on accept.
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Invite persistence failed.
    #[error(transparent)]
    Repository(#[from] InviteRepositoryError),

    /// Project persistence failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// Identity lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityStoreError),
}

impl InviteServiceError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InviteNotFound(_) | Self::ProjectNotFound(_) | Self::RecipientNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NotManager | Self::NotRecipient => ErrorKind::Forbidden,
            Self::AlreadyMember(_) => ErrorKind::Conflict,
            Self::Domain(err) => match err {
                InviteDomainError::OwnerRoleNotOfferable => ErrorKind::InvalidArgument,
                InviteDomainError::AlreadyResolved(_) => ErrorKind::InvalidState,
            },
            Self::Email(_) => ErrorKind::InvalidArgument,
            Self::Membership(err) => err.kind(),
            Self::Repository(err) => match err {
                InviteRepositoryError::DuplicatePending { .. } => ErrorKind::Conflict,
                InviteRepositoryError::NotFound(_) => ErrorKind::NotFound,
                InviteRepositoryError::Persistence(_) => ErrorKind::Unavailable,
            },
            Self::Projects(err) => match err {
                ProjectRepositoryError::DuplicateProject(_)
                | ProjectRepositoryError::VersionConflict(_) => ErrorKind::Conflict,
                ProjectRepositoryError::NotFound(_) => ErrorKind::NotFound,
                ProjectRepositoryError::Persistence(_) => ErrorKind::Unavailable,
            },
            Self::Identity(err) => match err {
                IdentityStoreError::DuplicateEmail(_) | IdentityStoreError::DuplicateUsername(_) => {
                    ErrorKind::Conflict
                }
                IdentityStoreError::NotFound(_) => ErrorKind::NotFound,
                IdentityStoreError::Persistence(_) => ErrorKind::Unavailable,
            },
        }
    }
}

/// Result type for invite service operations.
pub type InviteServiceResult<T> = Result<T, InviteServiceError>;

/// Invite protocol orchestration service.
#[derive(Clone)]
pub struct InviteService<R, P, S, C>
where
    R: InviteRepository,
    P: ProjectRepository,
    S: IdentityStore,
    C: Clock + Send + Sync,
{
    invites: Arc<R>,
    projects: Arc<P>,
    identities: Arc<S>,
    notifier: Arc<dyn NotificationDispatcher>,
    clock: Arc<C>,
    invite_link_base: String,
}

impl<R, P, S, C> InviteService<R, P, S, C>
where
    R: InviteRepository,
    P: ProjectRepository,
    S: IdentityStore,
    C: Clock + Send + Sync,
{
    /// Creates a new invite service.
    ///
    /// `invite_link_base` is the front-of-house URL prefix the notification
    /// links to; the invite id is appended to it.
    #[must_use]
    pub fn new(
        invites: Arc<R>,
        projects: Arc<P>,
        identities: Arc<S>,
        notifier: Arc<dyn NotificationDispatcher>,
        clock: Arc<C>,
        invite_link_base: impl Into<String>,
    ) -> Self {
        Self {
            invites,
            projects,
            identities,
            notifier,
            clock,
            invite_link_base: invite_link_base.into(),
        }
    }

    /// Sends a membership invite.
    ///
    /// The notification is dispatched once, after the invite is persisted; a
    /// dispatch failure is logged and never surfaces to the caller, so a
    /// transient mail outage cannot lose the invite.
    ///
    /// # Errors
    ///
    /// - [`InviteServiceError::NotManager`] when the caller is not
    ///   Owner/Admin of the project.
    /// - [`InviteServiceError::RecipientNotFound`] when no user is
    ///   registered under the address.
    /// - [`InviteServiceError::AlreadyMember`] when the recipient already
    ///   belongs to the project.
    /// - [`InviteServiceError::Repository`] with a duplicate-pending
    ///   conflict when an unresolved invite already exists for the pair.
    pub async fn send(
        &self,
        caller: Caller,
        request: SendInviteRequest,
    ) -> InviteServiceResult<Invite> {
        let project = self.load_project(request.project).await?;
        if !project
            .role_of(caller.user_id)
            .is_some_and(ProjectRole::can_manage)
        {
            return Err(InviteServiceError::NotManager);
        }

        let email = EmailAddress::new(request.recipient_email)?;
        let recipient = self
            .identities
            .find_by_email(&email)
            .await?
            .ok_or(InviteServiceError::RecipientNotFound(email.clone()))?;
        if project.is_member(recipient.id()) {
            return Err(InviteServiceError::AlreadyMember(recipient.id()));
        }
        if self
            .invites
            .pending_exists(project.id(), recipient.id())
            .await?
        {
            return Err(InviteServiceError::Repository(
                InviteRepositoryError::DuplicatePending {
                    project: project.id(),
                    recipient: recipient.id(),
                },
            ));
        }

        let role = request.role.unwrap_or(ProjectRole::Viewer);
        let invite = Invite::new(
            project.id(),
            caller.user_id,
            recipient.id(),
            role,
            &*self.clock,
        )?;
        self.invites.insert(&invite).await?;

        self.dispatch_notification(&invite, &project, &email, caller.user_id)
            .await;

        Ok(invite)
    }

    /// Applies the recipient's accept/decline response.
    ///
    /// Accepting grants the offered membership idempotently: a recipient who
    /// is somehow already a member ends up with no duplicate entry and no
    /// error. The membership write commits before the invite does, so a
    /// failed project write leaves the invite Pending and the recipient can
    /// respond again.
    ///
    /// # Errors
    ///
    /// - [`InviteServiceError::NotRecipient`] when the caller is not the
    ///   invited user.
    /// - [`InviteServiceError::Domain`] with `AlreadyResolved` when the
    ///   invite has left the Pending state.
    pub async fn respond(
        &self,
        caller: Caller,
        invite_id: InviteId,
        action: InviteAction,
    ) -> InviteServiceResult<Invite> {
        let mut invite = self.load_invite(invite_id).await?;
        if invite.recipient() != caller.user_id {
            return Err(InviteServiceError::NotRecipient);
        }

        invite.resolve(action)?;

        // Membership first: the invite stays Pending until the project write
        // has committed.
        if action == InviteAction::Accept {
            let mut project = self.load_project(invite.project()).await?;
            project.admit_member(invite.recipient(), invite.role(), &*self.clock)?;
            self.projects.update(&project).await?;
        }
        self.invites.update(&invite).await?;

        Ok(invite)
    }

    /// Returns the unauthenticated invite preview.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the invite, its project, or either
    /// party no longer exists.
    pub async fn preview(&self, invite_id: InviteId) -> InviteServiceResult<InvitePreview> {
        let invite = self.load_invite(invite_id).await?;
        let project = self.load_project(invite.project()).await?;
        let sender = self.load_user(invite.sender()).await?;
        let recipient = self.load_user(invite.recipient()).await?;

        Ok(InvitePreview {
            id: invite.id(),
            project_name: project.name().to_owned(),
            role: invite.role(),
            sender_name: sender.full_name().to_owned(),
            recipient_name: recipient.full_name().to_owned(),
            status: invite.status(),
        })
    }

    /// Lists every invite addressed to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`InviteServiceError::Repository`] when the lookup fails.
    pub async fn list_for_user(&self, caller: Caller) -> InviteServiceResult<Vec<Invite>> {
        Ok(self.invites.list_for_recipient(caller.user_id).await?)
    }

    /// Searches for invite candidates: users matching `query` who do not
    /// already participate in the project. Results are capped at ten.
    ///
    /// Requires only an authenticated caller; an empty query returns no
    /// results.
    ///
    /// # Errors
    ///
    /// Returns [`InviteServiceError::ProjectNotFound`] when the project is
    /// absent and [`InviteServiceError::Identity`] when the lookup fails.
    pub async fn search_candidates(
        &self,
        _caller: Caller,
        project_id: ProjectId,
        query: &str,
    ) -> InviteServiceResult<Vec<User>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let project = self.load_project(project_id).await?;
        let exclude = project.participant_ids();
        Ok(self
            .identities
            .search(query, &exclude, SEARCH_RESULT_LIMIT)
            .await?)
    }

    /// Renders and dispatches the invite notification, logging any failure.
    async fn dispatch_notification(
        &self,
        invite: &Invite,
        project: &Project,
        recipient_email: &EmailAddress,
        sender: UserId,
    ) {
        let sender_name = match self.identities.find_by_id(sender).await {
            Ok(Some(user)) => user.full_name().to_owned(),
            Ok(None) | Err(_) => "Someone".to_owned(),
        };
        let invite_link = format!("{}/{}", self.invite_link_base, invite.id());

        let rendered = render_invite_mail(
            project.name(),
            &sender_name,
            invite.role().as_str(),
            &invite_link,
        );
        let (subject, body) = match rendered {
            Ok(parts) => parts,
            Err(err) => {
                tracing::warn!(invite = %invite.id(), error = %err, "invite mail render failed");
                return;
            }
        };

        if let Err(err) = self.notifier.send(recipient_email, &subject, &body).await {
            tracing::warn!(invite = %invite.id(), error = %err, "invite notification failed");
        }
    }

    async fn load_invite(&self, id: InviteId) -> InviteServiceResult<Invite> {
        self.invites
            .find_by_id(id)
            .await?
            .ok_or(InviteServiceError::InviteNotFound(id))
    }

    async fn load_project(&self, id: ProjectId) -> InviteServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(InviteServiceError::ProjectNotFound(id))
    }

    async fn load_user(&self, id: UserId) -> InviteServiceResult<User> {
        self.identities
            .find_by_id(id)
            .await?
            .ok_or(InviteServiceError::Identity(IdentityStoreError::NotFound(
                id,
            )))
    }
}

/// Renders the invite subject and body templates.
fn render_invite_mail(
    project_name: &str,
    sender_name: &str,
    role: &str,
    invite_link: &str,
) -> Result<(String, String), minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("subject", INVITE_SUBJECT_TEMPLATE)?;
    env.add_template("body", INVITE_BODY_TEMPLATE)?;

    let ctx = context! {
        project_name => project_name,
        sender_name => sender_name,
        role => role,
        invite_link => invite_link,
    };
    let subject = env.get_template("subject")?.render(&ctx)?;
    let body = env.get_template("body")?.render(&ctx)?;
    Ok((subject, body))
}
