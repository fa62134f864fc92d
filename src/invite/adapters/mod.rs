//! Adapter implementations for invite ports.

pub mod memory;

pub use memory::{
    FailingDispatcher, InMemoryInviteRepository, RecordingDispatcher, SentNotification,
};
