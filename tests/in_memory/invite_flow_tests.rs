//! Invite send/respond flows against a real directory.

use crate::in_memory::helpers::{create_project, register, stack};
use atelier::invite::{
    domain::{InviteAction, InviteStatus},
    services::SendInviteRequest,
};
use atelier::project::domain::ProjectRole;
use eyre::ensure;

#[tokio::test(flavor = "multi_thread")]
async fn an_accepted_invite_opens_the_project() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;

    let invite = stack
        .invites
        .send(
            alice.caller(),
            SendInviteRequest::new(project.id(), "bob@example.com").with_role(ProjectRole::Member),
        )
        .await?;

    // Bob sees the pending offer and the mail went out.
    let inbox = stack.invites.list_for_user(bob.caller()).await?;
    ensure!(inbox.len() == 1);
    ensure!(stack.dispatcher.sent().len() == 1);

    let preview = stack.invites.preview(invite.id()).await?;
    ensure!(preview.project_name == "Atlas rollout");
    ensure!(preview.sender_name == "Alice Archer");

    let resolved = stack
        .invites
        .respond(bob.caller(), invite.id(), InviteAction::Accept)
        .await?;
    ensure!(resolved.status() == InviteStatus::Accepted);

    let fetched = stack.projects.get(bob.caller(), project.id()).await?;
    ensure!(fetched.role_of(bob.id()) == Some(ProjectRole::Member));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn a_declined_invite_leaves_the_project_closed() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;

    let invite = stack
        .invites
        .send(
            alice.caller(),
            SendInviteRequest::new(project.id(), "bob@example.com"),
        )
        .await?;
    stack
        .invites
        .respond(bob.caller(), invite.id(), InviteAction::Decline)
        .await?;

    ensure!(stack.projects.get(bob.caller(), project.id()).await.is_err());

    // A fresh invite is allowed once the first one is resolved.
    let second = stack
        .invites
        .send(
            alice.caller(),
            SendInviteRequest::new(project.id(), "bob@example.com"),
        )
        .await?;
    ensure!(second.status() == InviteStatus::Pending);
    Ok(())
}
