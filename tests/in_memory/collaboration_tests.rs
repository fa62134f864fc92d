//! Membership protocol scenarios across the role hierarchy.

use crate::in_memory::helpers::{create_project, register, stack};
use atelier::error::ErrorKind;
use atelier::project::{
    domain::{MembershipError, ProjectRole},
    services::ProjectServiceError,
};
use eyre::ensure;

#[tokio::test(flavor = "multi_thread")]
async fn an_admin_manages_members_but_never_mints_admins() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let carol = register(&stack, "Carol Chen", "carol").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;

    // Alice (Owner) grants Bob the Admin role.
    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Admin)
        .await?;

    // Bob (Admin) may admit Carol as a Member.
    let after_add = stack
        .membership
        .add_member(bob.caller(), project.id(), carol.id(), ProjectRole::Member)
        .await?;
    ensure!(after_add.role_of(carol.id()) == Some(ProjectRole::Member));

    // Bob may demote Carol to Viewer.
    let after_demote = stack
        .membership
        .change_member_role(bob.caller(), project.id(), carol.id(), ProjectRole::Viewer)
        .await?;
    ensure!(after_demote.role_of(carol.id()) == Some(ProjectRole::Viewer));

    // Bob may not grant Carol the Admin role.
    let promote_denied = stack
        .membership
        .change_member_role(bob.caller(), project.id(), carol.id(), ProjectRole::Admin)
        .await;
    ensure!(matches!(
        promote_denied,
        Err(ProjectServiceError::Membership(
            MembershipError::AdminGrantRequiresOwner
        ))
    ));

    // Bob may remove Carol outright.
    let after_remove = stack
        .membership
        .remove_member(bob.caller(), project.id(), carol.id())
        .await?;
    ensure!(!after_remove.is_member(carol.id()));

    // Nobody removes the Owner.
    let owner_removal = stack
        .membership
        .remove_member(bob.caller(), project.id(), alice.id())
        .await;
    ensure!(matches!(
        owner_removal,
        Err(ProjectServiceError::Membership(MembershipError::OwnerImmutable))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn members_and_viewers_cannot_touch_the_members_list() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let carol = register(&stack, "Carol Chen", "carol").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;

    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Member)
        .await?;

    let denied = stack
        .membership
        .add_member(bob.caller(), project.id(), carol.id(), ProjectRole::Viewer)
        .await;
    ensure!(matches!(
        denied,
        Err(ProjectServiceError::Membership(MembershipError::Forbidden))
    ));
    if let Err(err) = denied {
        ensure!(err.kind() == ErrorKind::Forbidden);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn project_visibility_follows_membership() -> eyre::Result<()> {
    let stack = stack();
    let alice = register(&stack, "Alice Archer", "alice").await?;
    let bob = register(&stack, "Bob Brown", "bob").await?;
    let project = create_project(&stack, &alice, "Atlas rollout").await?;

    ensure!(stack.projects.list_for_user(bob.caller()).await?.is_empty());
    let denied = stack.projects.get(bob.caller(), project.id()).await;
    ensure!(matches!(denied, Err(ProjectServiceError::Forbidden)));

    stack
        .membership
        .add_member(alice.caller(), project.id(), bob.id(), ProjectRole::Viewer)
        .await?;

    let visible = stack.projects.list_for_user(bob.caller()).await?;
    ensure!(visible.len() == 1);
    ensure!(stack.projects.get(bob.caller(), project.id()).await.is_ok());
    Ok(())
}
