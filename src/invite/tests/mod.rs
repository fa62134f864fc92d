//! Unit tests for the invite module.
