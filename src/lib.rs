//! Atelier: multi-tenant project collaboration backend.
//!
//! This crate provides the core functionality for running shared project
//! workspaces: role-based access control, a guarded membership mutation
//! protocol, an invite offer/response flow, and a task lifecycle engine
//! with submission review.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, dispatchers)
//!
//! # Modules
//!
//! - [`identity`]: Users, global roles, and caller authentication
//! - [`project`]: Project aggregate, membership roles, and mutation rules
//! - [`invite`]: Membership offers and their accept/decline protocol
//! - [`task`]: Task lifecycle, submissions, and approval review

pub mod error;
pub mod identity;
pub mod invite;
pub mod project;
pub mod task;
