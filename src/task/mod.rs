//! Task lifecycle engine: work items scoped to a project.
//!
//! A task moves To Do -> In Progress under assignee control, enters review
//! through a submission carrying at least one attachment, and is approved
//! or rejected by an Owner/Admin. Approved and Rejected are terminal;
//! nothing but the comment thread changes afterwards. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
