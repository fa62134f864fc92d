//! Task lifecycle from creation through submission to review.

use crate::in_memory::helpers::{create_project, evidence, register, stack};
use atelier::project::domain::ProjectRole;
use atelier::task::{
    domain::{Assignee, TaskDomainError, TaskStatus},
    services::{CreateTaskRequest, TaskServiceError},
};
use eyre::ensure;

#[tokio::test(flavor = "multi_thread")]
async fn a_task_travels_from_to_do_to_approved() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;
    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Member)
        .await?;

    let task = stack
        .tasks
        .create(
            bob.caller(),
            CreateTaskRequest::new(project.id(), "Wire up the dashboard")
                .with_assignees(vec![Assignee::new(bob.id(), ProjectRole::Member)]),
        )
        .await?;
    ensure!(task.status() == TaskStatus::ToDo);

    let started = stack
        .tasks
        .set_status(bob.caller(), task.id(), TaskStatus::InProgress)
        .await?;
    ensure!(started.status() == TaskStatus::InProgress);

    let submitted = stack
        .tasks
        .submit(
            bob.caller(),
            task.id(),
            "charts and filters are in",
            vec![evidence("dashboard.png")],
        )
        .await?;
    ensure!(submitted.status() == TaskStatus::SubjectForApproval);
    ensure!(submitted.completed_at().is_some());

    let approved = stack.tasks.approve(alice.caller(), task.id()).await?;
    ensure!(approved.status() == TaskStatus::Approved);
    ensure!(approved.approved_by() == Some(alice.id()));

    // Approved tasks stay open for comments and nothing else.
    let commented = stack
        .tasks
        .add_comment(bob.caller(), task.id(), "thanks for the review")
        .await?;
    ensure!(commented.comments().len() == 1);

    let reopened = stack
        .tasks
        .set_status(bob.caller(), task.id(), TaskStatus::ToDo)
        .await;
    ensure!(matches!(
        reopened,
        Err(TaskServiceError::Domain(TaskDomainError::TaskImmutable(
            TaskStatus::Approved
        )))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejection_requires_a_fresh_submission_cycle() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;
    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Member)
        .await?;

    let task = stack
        .tasks
        .create(
            bob.caller(),
            CreateTaskRequest::new(project.id(), "Write the runbook")
                .with_assignees(vec![Assignee::new(bob.id(), ProjectRole::Member)]),
        )
        .await?;
    stack
        .tasks
        .submit(bob.caller(), task.id(), "draft", vec![evidence("runbook.md")])
        .await?;

    let rejected = stack.tasks.reject(alice.caller(), task.id()).await?;
    ensure!(rejected.status() == TaskStatus::Rejected);
    ensure!(rejected.approved_by().is_none());

    // Rejected is terminal; the work continues in a new task.
    let resubmit = stack
        .tasks
        .submit(bob.caller(), task.id(), "fixed", vec![evidence("runbook.md")])
        .await;
    ensure!(matches!(
        resubmit,
        Err(TaskServiceError::Domain(TaskDomainError::TaskImmutable(
            TaskStatus::Rejected
        )))
    ));
    Ok(())
}
