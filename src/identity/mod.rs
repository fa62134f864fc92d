//! User identity and caller authentication.
//!
//! Leaf dependency for every other module: holds user records, resolves
//! credentials into a trusted [`domain::Caller`], and backs the user
//! directory search used when composing invites. The module follows
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
