//! Application services for project and membership management.

mod membership;
mod projects;

pub use membership::MembershipService;
pub use projects::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    UpdateProjectRequest,
};
