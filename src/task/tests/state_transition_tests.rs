//! Unit tests for task lifecycle transitions.

use crate::identity::domain::UserId;
use crate::project::domain::ProjectRole;
use crate::task::domain::{
    Assignee, Attachment, NewTaskParams, Task, TaskDomainError, TaskPriority, TaskStatus,
};
use chrono::Utc;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn assigned_task(assignee: UserId, clock: &impl Clock) -> Task {
    Task::create(
        NewTaskParams {
            project: crate::project::domain::ProjectId::new(),
            title: "Wire up the dashboard".to_owned(),
            description: String::new(),
            priority: TaskPriority::Medium,
            assignees: vec![Assignee::new(assignee, ProjectRole::Member)],
            due_date: None,
            created_by: UserId::new(),
        },
        clock,
    )
    .expect("task creation should succeed")
}

fn attachment(clock: &impl Clock) -> Attachment {
    Attachment {
        filename: "report.pdf".to_owned(),
        url: "memory://blob/report.pdf".to_owned(),
        uploaded_at: clock.utc(),
    }
}

/// Drives a fresh task into the given state through the public transitions.
fn task_in_state(status: TaskStatus, assignee: UserId, clock: &impl Clock) -> Task {
    let mut task = assigned_task(assignee, clock);
    let reviewer = Some(ProjectRole::Admin);
    match status {
        TaskStatus::ToDo => {}
        TaskStatus::InProgress => {
            task.set_status(assignee, None, TaskStatus::InProgress, clock)
                .expect("transition to in_progress");
        }
        TaskStatus::SubjectForApproval => {
            task.submit(assignee, "done", vec![attachment(clock)], clock)
                .expect("submission");
        }
        TaskStatus::Approved => {
            task.submit(assignee, "done", vec![attachment(clock)], clock)
                .expect("submission");
            task.approve(UserId::new(), reviewer, clock).expect("approval");
        }
        TaskStatus::Rejected => {
            task.submit(assignee, "done", vec![attachment(clock)], clock)
                .expect("submission");
            task.reject(reviewer, clock).expect("rejection");
        }
    }
    task
}

#[rstest]
#[case(TaskStatus::ToDo, false, true)]
#[case(TaskStatus::InProgress, false, true)]
#[case(TaskStatus::SubjectForApproval, false, false)]
#[case(TaskStatus::Approved, true, false)]
#[case(TaskStatus::Rejected, true, false)]
fn status_classification(
    #[case] status: TaskStatus,
    #[case] terminal: bool,
    #[case] settable: bool,
) {
    assert_eq!(status.is_terminal(), terminal);
    assert_eq!(status.is_settable(), settable);
}

#[rstest]
#[case("to_do", TaskStatus::ToDo)]
#[case("in_progress", TaskStatus::InProgress)]
#[case(" SUBJECT_FOR_APPROVAL ", TaskStatus::SubjectForApproval)]
#[case("approved", TaskStatus::Approved)]
#[case("rejected", TaskStatus::Rejected)]
fn task_status_parses_canonical_forms(#[case] input: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(input).expect("parsable status"), expected);
    assert_eq!(TaskStatus::try_from(expected.as_str()), Ok(expected));
}

#[rstest]
fn task_status_rejects_unknown_values() {
    assert!(TaskStatus::try_from("blocked").is_err());
}

#[rstest]
#[case(TaskStatus::ToDo, TaskStatus::InProgress, true)]
#[case(TaskStatus::ToDo, TaskStatus::ToDo, true)]
#[case(TaskStatus::InProgress, TaskStatus::ToDo, true)]
#[case(TaskStatus::InProgress, TaskStatus::InProgress, true)]
#[case(TaskStatus::ToDo, TaskStatus::SubjectForApproval, false)]
#[case(TaskStatus::ToDo, TaskStatus::Approved, false)]
#[case(TaskStatus::ToDo, TaskStatus::Rejected, false)]
#[case(TaskStatus::InProgress, TaskStatus::Approved, false)]
fn set_status_only_reaches_directly_settable_states(
    clock: DefaultClock,
    #[case] from: TaskStatus,
    #[case] target: TaskStatus,
    #[case] permitted: bool,
) {
    let assignee = UserId::new();
    let mut task = task_in_state(from, assignee, &clock);

    let result = task.set_status(assignee, None, target, &clock);
    if permitted {
        result.expect("transition should succeed");
        assert_eq!(task.status(), target);
    } else {
        assert!(matches!(
            result,
            Err(TaskDomainError::StatusNotSettable(rejected)) if rejected == target
        ));
        assert_eq!(task.status(), from);
    }
}

#[rstest]
#[case(TaskStatus::SubjectForApproval)]
#[case(TaskStatus::Approved)]
#[case(TaskStatus::Rejected)]
fn set_status_is_rejected_outside_the_settable_states(
    clock: DefaultClock,
    #[case] from: TaskStatus,
) {
    let assignee = UserId::new();
    let mut task = task_in_state(from, assignee, &clock);

    let result = task.set_status(assignee, None, TaskStatus::InProgress, &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::TaskImmutable(status)) if status == from
    ));
}

#[rstest]
fn set_status_requires_assignment_or_a_managing_role(clock: DefaultClock) {
    let assignee = UserId::new();
    let outsider = UserId::new();
    let mut task = assigned_task(assignee, &clock);

    let result = task.set_status(outsider, Some(ProjectRole::Member), TaskStatus::InProgress, &clock);
    assert!(matches!(result, Err(TaskDomainError::Forbidden)));

    task.set_status(outsider, Some(ProjectRole::Admin), TaskStatus::InProgress, &clock)
        .expect("managers may move any task");
    assert_eq!(task.status(), TaskStatus::InProgress);
}

#[rstest]
fn submit_moves_the_task_into_review(clock: DefaultClock) {
    let assignee = UserId::new();
    let mut task = assigned_task(assignee, &clock);
    let before = Utc::now();

    task.submit(assignee, "first pass", vec![attachment(&clock)], &clock)
        .expect("submission should succeed");

    assert_eq!(task.status(), TaskStatus::SubjectForApproval);
    assert_eq!(task.submissions().len(), 1);
    assert!(task.completed_at().is_some_and(|at| at >= before));
}

#[rstest]
fn submit_requires_at_least_one_attachment(clock: DefaultClock) {
    let assignee = UserId::new();
    let mut task = assigned_task(assignee, &clock);

    let result = task.submit(assignee, "no evidence", Vec::new(), &clock);
    assert!(matches!(result, Err(TaskDomainError::NoAttachments)));
    assert_eq!(task.status(), TaskStatus::ToDo);

    task.submit(assignee, "evidence", vec![attachment(&clock)], &clock)
        .expect("one attachment is enough");
}

#[rstest]
fn submit_requires_assignment(clock: DefaultClock) {
    let assignee = UserId::new();
    let outsider = UserId::new();
    let mut task = assigned_task(assignee, &clock);

    let result = task.submit(outsider, "drive-by", vec![attachment(&clock)], &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::NotAssigned(id)) if id == outsider
    ));
}

#[rstest]
fn resubmission_after_review_appends_to_the_log(clock: DefaultClock) {
    let assignee = UserId::new();
    let mut task = task_in_state(TaskStatus::SubjectForApproval, assignee, &clock);

    task.submit(assignee, "second pass", vec![attachment(&clock)], &clock)
        .expect("resubmission while in review");
    assert_eq!(task.submissions().len(), 2);
    assert_eq!(task.status(), TaskStatus::SubjectForApproval);
}

#[rstest]
fn approve_records_the_reviewer(clock: DefaultClock) {
    let assignee = UserId::new();
    let reviewer = UserId::new();
    let mut task = task_in_state(TaskStatus::SubjectForApproval, assignee, &clock);

    task.approve(reviewer, Some(ProjectRole::Owner), &clock)
        .expect("approval should succeed");

    assert_eq!(task.status(), TaskStatus::Approved);
    assert_eq!(task.approved_by(), Some(reviewer));
}

#[rstest]
fn reject_leaves_no_approver(clock: DefaultClock) {
    let assignee = UserId::new();
    let mut task = task_in_state(TaskStatus::SubjectForApproval, assignee, &clock);

    task.reject(Some(ProjectRole::Admin), &clock)
        .expect("rejection should succeed");

    assert_eq!(task.status(), TaskStatus::Rejected);
    assert_eq!(task.approved_by(), None);
}

#[rstest]
#[case(Some(ProjectRole::Member))]
#[case(Some(ProjectRole::Viewer))]
#[case(None)]
fn review_requires_a_managing_role(clock: DefaultClock, #[case] role: Option<ProjectRole>) {
    let assignee = UserId::new();
    let mut task = task_in_state(TaskStatus::SubjectForApproval, assignee, &clock);

    assert!(matches!(
        task.approve(UserId::new(), role, &clock),
        Err(TaskDomainError::Forbidden)
    ));
    assert!(matches!(
        task.reject(role, &clock),
        Err(TaskDomainError::Forbidden)
    ));
}

#[rstest]
#[case(TaskStatus::ToDo)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Approved)]
#[case(TaskStatus::Rejected)]
fn review_is_only_valid_from_subject_for_approval(
    clock: DefaultClock,
    #[case] from: TaskStatus,
) {
    let assignee = UserId::new();
    let mut task = task_in_state(from, assignee, &clock);

    let result = task.approve(UserId::new(), Some(ProjectRole::Owner), &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::NotAwaitingApproval(status)) if status == from
    ));
}
