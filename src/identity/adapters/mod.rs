//! Adapter implementations for identity ports.

pub mod memory;

pub use memory::{InMemoryIdentityStore, StaticTokenAuthenticator};
