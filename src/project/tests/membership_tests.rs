//! Unit tests for the guarded membership mutation path.

use crate::error::ErrorKind;
use crate::identity::domain::UserId;
use crate::project::domain::{
    MemberSpec, Membership, MembershipError, NewProjectParams, Project, ProjectPriority,
    ProjectRole,
};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Cast {
    owner: UserId,
    admin: UserId,
    member: UserId,
    viewer: UserId,
    project: Project,
}

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

/// A project with one user in each role.
#[fixture]
fn cast(clock: DefaultClock) -> Cast {
    let owner = UserId::new();
    let admin = UserId::new();
    let member = UserId::new();
    let viewer = UserId::new();

    let mut project = Project::create(
        NewProjectParams {
            name: "Atlas rollout".to_owned(),
            description: String::new(),
            created_by: owner,
            start_date: None,
            due_date: Utc::now() + Duration::days(30),
            priority: ProjectPriority::Medium,
        },
        &clock,
    )
    .expect("creation should succeed");

    project
        .add_member(owner, admin, ProjectRole::Admin, &clock)
        .expect("owner grants admin");
    project
        .add_member(owner, member, ProjectRole::Member, &clock)
        .expect("owner adds member");
    project
        .add_member(admin, viewer, ProjectRole::Viewer, &clock)
        .expect("admin adds viewer");

    Cast {
        owner,
        admin,
        member,
        viewer,
        project,
    }
}

#[rstest]
fn admin_may_add_members_and_viewers(mut cast: Cast, clock: DefaultClock) {
    let newcomer = UserId::new();
    cast.project
        .add_member(cast.admin, newcomer, ProjectRole::Member, &clock)
        .expect("admin adds member");
    assert_eq!(cast.project.role_of(newcomer), Some(ProjectRole::Member));
}

#[rstest]
fn admin_may_not_grant_admin(mut cast: Cast, clock: DefaultClock) {
    let newcomer = UserId::new();
    let result = cast
        .project
        .add_member(cast.admin, newcomer, ProjectRole::Admin, &clock);
    assert!(matches!(
        result,
        Err(MembershipError::AdminGrantRequiresOwner)
    ));
    assert_eq!(
        MembershipError::AdminGrantRequiresOwner.kind(),
        ErrorKind::Forbidden
    );
}

#[rstest]
fn admin_may_remove_and_demote_but_not_promote_to_admin(mut cast: Cast, clock: DefaultClock) {
    cast.project
        .change_member_role(cast.admin, cast.member, ProjectRole::Viewer, &clock)
        .expect("admin demotes member");
    assert_eq!(cast.project.role_of(cast.member), Some(ProjectRole::Viewer));

    let result =
        cast.project
            .change_member_role(cast.admin, cast.member, ProjectRole::Admin, &clock);
    assert!(matches!(
        result,
        Err(MembershipError::AdminGrantRequiresOwner)
    ));

    cast.project
        .remove_member(cast.admin, cast.member, &clock)
        .expect("admin removes member");
    assert!(!cast.project.is_member(cast.member));
}

#[rstest]
fn owner_may_grant_admin(mut cast: Cast, clock: DefaultClock) {
    cast.project
        .change_member_role(cast.owner, cast.member, ProjectRole::Admin, &clock)
        .expect("owner promotes member");
    assert_eq!(cast.project.role_of(cast.member), Some(ProjectRole::Admin));
}

#[rstest]
#[case(ProjectRole::Member)]
#[case(ProjectRole::Viewer)]
fn non_managers_may_not_mutate_membership(
    mut cast: Cast,
    clock: DefaultClock,
    #[case] actor_role: ProjectRole,
) {
    let actor = match actor_role {
        ProjectRole::Member => cast.member,
        _ => cast.viewer,
    };
    let newcomer = UserId::new();

    assert!(matches!(
        cast.project
            .add_member(actor, newcomer, ProjectRole::Viewer, &clock),
        Err(MembershipError::Forbidden)
    ));
    assert!(matches!(
        cast.project.remove_member(actor, cast.viewer, &clock),
        Err(MembershipError::Forbidden)
    ));
    assert!(matches!(
        cast.project
            .change_member_role(actor, cast.viewer, ProjectRole::Member, &clock),
        Err(MembershipError::Forbidden)
    ));
}

#[rstest]
fn owner_role_is_never_assignable(mut cast: Cast, clock: DefaultClock) {
    let newcomer = UserId::new();
    assert!(matches!(
        cast.project
            .add_member(cast.owner, newcomer, ProjectRole::Owner, &clock),
        Err(MembershipError::OwnerRoleNotAssignable)
    ));
    assert!(matches!(
        cast.project
            .change_member_role(cast.owner, cast.member, ProjectRole::Owner, &clock),
        Err(MembershipError::OwnerRoleNotAssignable)
    ));
}

#[rstest]
fn the_owner_entry_is_immutable(mut cast: Cast, clock: DefaultClock) {
    assert!(matches!(
        cast.project.remove_member(cast.admin, cast.owner, &clock),
        Err(MembershipError::OwnerImmutable)
    ));
    assert!(matches!(
        cast.project
            .change_member_role(cast.admin, cast.owner, ProjectRole::Viewer, &clock),
        Err(MembershipError::OwnerImmutable)
    ));
    assert_eq!(MembershipError::OwnerImmutable.kind(), ErrorKind::InvalidState);
}

#[rstest]
fn duplicate_additions_are_rejected(mut cast: Cast, clock: DefaultClock) {
    let result = cast
        .project
        .add_member(cast.owner, cast.member, ProjectRole::Viewer, &clock);
    assert!(matches!(result, Err(MembershipError::DuplicateMember(id)) if id == cast.member));
}

#[rstest]
fn removing_a_stranger_reports_member_not_found(mut cast: Cast, clock: DefaultClock) {
    let stranger = UserId::new();
    let result = cast.project.remove_member(cast.owner, stranger, &clock);
    assert!(matches!(result, Err(MembershipError::MemberNotFound(id)) if id == stranger));
    assert_eq!(
        MembershipError::MemberNotFound(stranger).kind(),
        ErrorKind::NotFound
    );
}

#[rstest]
fn replace_members_is_owner_only(mut cast: Cast, clock: DefaultClock) {
    let specs = vec![MemberSpec::new(cast.member, ProjectRole::Member)];
    assert!(matches!(
        cast.project.replace_members(cast.admin, &specs, &clock),
        Err(MembershipError::Forbidden)
    ));
}

#[rstest]
fn replace_members_normalizes_the_payload(mut cast: Cast, clock: DefaultClock) {
    let newcomer = UserId::new();
    // Duplicate entries, an Owner-role request, and an entry for the creator:
    // all must be normalized away.
    let specs = vec![
        MemberSpec::new(newcomer, ProjectRole::Owner),
        MemberSpec::new(newcomer, ProjectRole::Viewer),
        MemberSpec::new(cast.owner, ProjectRole::Viewer),
        MemberSpec::new(cast.member, ProjectRole::Admin),
    ];
    cast.project
        .replace_members(cast.owner, &specs, &clock)
        .expect("replacement should succeed");

    assert_eq!(cast.project.role_of(cast.owner), Some(ProjectRole::Owner));
    assert_eq!(cast.project.role_of(newcomer), Some(ProjectRole::Member));
    assert_eq!(cast.project.role_of(cast.member), Some(ProjectRole::Admin));
    assert!(!cast.project.is_member(cast.admin));
    assert!(!cast.project.is_member(cast.viewer));

    let owners = cast
        .project
        .members()
        .iter()
        .filter(|entry| entry.role() == ProjectRole::Owner)
        .count();
    assert_eq!(owners, 1);
}

#[rstest]
fn replace_members_preserves_added_at_for_retained_members(mut cast: Cast, clock: DefaultClock) {
    let original_added_at = cast
        .project
        .members()
        .iter()
        .find(|entry| entry.user() == cast.member)
        .map(Membership::added_at)
        .expect("member entry exists");

    let specs = vec![MemberSpec::new(cast.member, ProjectRole::Viewer)];
    cast.project
        .replace_members(cast.owner, &specs, &clock)
        .expect("replacement should succeed");

    let retained = cast
        .project
        .members()
        .iter()
        .find(|entry| entry.user() == cast.member)
        .expect("member retained");
    assert_eq!(retained.added_at(), original_added_at);
    assert_eq!(retained.role(), ProjectRole::Viewer);
}

#[rstest]
fn admit_member_is_idempotent(mut cast: Cast, clock: DefaultClock) {
    let before = cast.project.members().len();
    cast.project
        .admit_member(cast.member, ProjectRole::Viewer, &clock)
        .expect("idempotent admission");
    assert_eq!(cast.project.members().len(), before);
    // The existing role wins over the re-admitted one.
    assert_eq!(cast.project.role_of(cast.member), Some(ProjectRole::Member));
}

#[rstest]
fn admit_member_rejects_the_owner_role(mut cast: Cast, clock: DefaultClock) {
    assert!(matches!(
        cast.project
            .admit_member(UserId::new(), ProjectRole::Owner, &clock),
        Err(MembershipError::OwnerRoleNotAssignable)
    ));
}
