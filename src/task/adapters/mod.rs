//! Adapter implementations for task ports.

pub mod memory;

pub use memory::{InMemoryAttachmentStore, InMemoryTaskRepository};
