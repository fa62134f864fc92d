//! Invite protocol: offers of project membership.
//!
//! An invite moves from Pending to exactly one terminal state (Accepted or
//! Declined) under the recipient's control; accepting grants membership
//! idempotently through the project aggregate. Notification delivery is
//! fire-and-forget so a mail outage never loses an invite. The module
//! follows hexagonal architecture:
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
