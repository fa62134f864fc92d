//! Project aggregate, role resolution, and membership management.
//!
//! A project owns its members list; the aggregate's guarded methods are the
//! only mutation path, so the Owner-immutability and uniqueness invariants
//! hold after every change regardless of caller. The module follows
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
