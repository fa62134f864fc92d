//! Project deletion removes dependent invites and tasks.

use crate::in_memory::helpers::{create_project, evidence, register, stack};
use atelier::invite::{ports::InviteRepository, services::SendInviteRequest};
use atelier::project::{domain::ProjectRole, services::ProjectServiceError};
use atelier::task::{
    domain::{Assignee, TaskStatus},
    ports::TaskRepository,
    services::CreateTaskRequest,
};
use eyre::ensure;

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_sweeps_invites_and_tasks() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let carol = register(&stack, "Carol Chen", "carol").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;
    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Member)
        .await?;

    stack
        .invites
        .send(
            alice.caller(),
            SendInviteRequest::new(project.id(), "carol@example.com"),
        )
        .await?;
    let task = stack
        .tasks
        .create(
            bob.caller(),
            CreateTaskRequest::new(project.id(), "Wire up the dashboard")
                .with_assignees(vec![Assignee::new(bob.id(), ProjectRole::Member)]),
        )
        .await?;
    stack
        .tasks
        .submit(bob.caller(), task.id(), "done", vec![evidence("proof.png")])
        .await?;

    stack.projects.delete(alice.caller(), project.id()).await?;

    let gone = stack.projects.get(alice.caller(), project.id()).await;
    ensure!(matches!(gone, Err(ProjectServiceError::NotFound(_))));
    ensure!(stack
        .invite_repo
        .list_for_recipient(carol.id())
        .await?
        .is_empty());
    ensure!(stack.task_repo.list_for_project(project.id()).await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn only_the_owner_may_delete_and_other_projects_survive() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let doomed = create_project(&stack, &alice, "Atlas rollout").await?;
    let survivor = create_project(&stack, &alice, "Beacon refresh").await?;
    stack
        .membership
        .add_member(alice.caller(), doomed.id(), bob.id(), ProjectRole::Admin)
        .await?;

    let kept_task = stack
        .tasks
        .create(
            alice.caller(),
            CreateTaskRequest::new(survivor.id(), "Draft the brief"),
        )
        .await?;

    // Admins administer members, not the project's existence.
    let denied = stack.projects.delete(bob.caller(), doomed.id()).await;
    ensure!(matches!(denied, Err(ProjectServiceError::Forbidden)));

    stack.projects.delete(alice.caller(), doomed.id()).await?;

    let remaining = stack.task_repo.list_for_project(survivor.id()).await?;
    ensure!(remaining.len() == 1);
    let fetched = stack.tasks.get(alice.caller(), kept_task.id()).await?;
    ensure!(fetched.status() == TaskStatus::ToDo);
    Ok(())
}
