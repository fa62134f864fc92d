//! Domain model for projects, role resolution, and membership.
//!
//! The project aggregate is the single guarded mutation path for its
//! members list; every membership rule lives here rather than in callers.

mod error;
mod ids;
mod member;
mod project;

pub use error::{
    MembershipError, ParseProjectPriorityError, ParseProjectRoleError, ParseProjectStatusError,
    ProjectDomainError,
};
pub use ids::ProjectId;
pub use member::{MemberSpec, Membership, ProjectRole};
pub use project::{
    NewProjectParams, PersistedProjectData, Project, ProjectEdit, ProjectPriority, ProjectStatus,
};
