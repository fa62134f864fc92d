//! Shared test helpers wiring the full in-memory service stack.

use atelier::identity::{
    adapters::InMemoryIdentityStore,
    domain::User,
    services::{DirectoryService, RegisterUserRequest},
};
use atelier::invite::{
    adapters::{InMemoryInviteRepository, RecordingDispatcher},
    services::InviteService,
};
use atelier::project::{
    adapters::InMemoryProjectRepository,
    domain::Project,
    services::{CreateProjectRequest, MembershipService, ProjectService},
};
use atelier::task::{
    adapters::{InMemoryAttachmentStore, InMemoryTaskRepository},
    services::{TaskLifecycleService, UploadAttachment},
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use std::sync::Arc;

/// The complete service stack over in-memory adapters, wired the way a
/// deployment would wire it: one store per aggregate, deletion cascades
/// registered on the project service.
pub struct Stack {
    /// Account registration and user directory.
    pub directory: DirectoryService<InMemoryIdentityStore, DefaultClock>,
    /// Project CRUD with deletion cascades registered.
    pub projects: ProjectService<InMemoryProjectRepository, DefaultClock>,
    /// Guarded membership mutations.
    pub membership: MembershipService<InMemoryProjectRepository, DefaultClock>,
    /// Invite protocol over the recording dispatcher.
    pub invites: InviteService<
        InMemoryInviteRepository,
        InMemoryProjectRepository,
        InMemoryIdentityStore,
        DefaultClock,
    >,
    /// Task lifecycle over the in-memory attachment store.
    pub tasks: TaskLifecycleService<
        InMemoryTaskRepository,
        InMemoryProjectRepository,
        InMemoryAttachmentStore<DefaultClock>,
        DefaultClock,
    >,
    /// Direct handle on the invite store for post-condition checks.
    pub invite_repo: Arc<InMemoryInviteRepository>,
    /// Direct handle on the task store for post-condition checks.
    pub task_repo: Arc<InMemoryTaskRepository>,
    /// Captured outbound notifications.
    pub dispatcher: RecordingDispatcher,
}

/// Builds a fresh stack for each test.
pub fn stack() -> Stack {
    let clock = Arc::new(DefaultClock);
    let identities = Arc::new(InMemoryIdentityStore::new());
    let project_repo = Arc::new(InMemoryProjectRepository::new());
    let invite_repo = Arc::new(InMemoryInviteRepository::new());
    let task_repo = Arc::new(InMemoryTaskRepository::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new(Arc::clone(&clock)));
    let dispatcher = RecordingDispatcher::new();

    let directory = DirectoryService::new(Arc::clone(&identities), Arc::clone(&clock));
    let projects = ProjectService::new(Arc::clone(&project_repo), Arc::clone(&clock))
        .with_cascade(Arc::clone(&invite_repo) as _)
        .with_cascade(Arc::clone(&task_repo) as _);
    let membership = MembershipService::new(Arc::clone(&project_repo), Arc::clone(&clock));
    let invites = InviteService::new(
        Arc::clone(&invite_repo),
        Arc::clone(&project_repo),
        Arc::clone(&identities),
        Arc::new(dispatcher.clone()),
        Arc::clone(&clock),
        "https://atelier.example/invites",
    );
    let tasks = TaskLifecycleService::new(
        Arc::clone(&task_repo),
        Arc::clone(&project_repo),
        attachments,
        clock,
    );

    Stack {
        directory,
        projects,
        membership,
        invites,
        tasks,
        invite_repo,
        task_repo,
        dispatcher,
    }
}

/// Registers an account through the directory service.
///
/// # Errors
///
/// Returns an error when registration fails.
pub async fn register(stack: &Stack, name: &str, username: &str) -> eyre::Result<User> {
    Ok(stack
        .directory
        .register(RegisterUserRequest::new(
            name,
            username,
            format!("{username}@example.com"),
            "argon2-hash",
        ))
        .await?)
}

/// Creates a project due in thirty days, owned by the user.
///
/// # Errors
///
/// Returns an error when creation fails.
pub async fn create_project(stack: &Stack, owner: &User, name: &str) -> eyre::Result<Project> {
    Ok(stack
        .projects
        .create(
            owner.caller(),
            CreateProjectRequest::new(name).with_due_date(Utc::now() + Duration::days(30)),
        )
        .await?)
}

/// A small upload usable as submission evidence.
pub fn evidence(filename: &str) -> UploadAttachment {
    UploadAttachment {
        filename: filename.to_owned(),
        content: b"%PDF-1.7 evidence".to_vec(),
    }
}
