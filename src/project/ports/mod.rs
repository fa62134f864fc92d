//! Port contracts for project persistence and deletion cascades.

pub mod cascade;
pub mod repository;

pub use cascade::{CascadeError, ProjectCascade};
pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
