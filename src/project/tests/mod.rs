//! Unit tests for the project module.

mod membership_tests;
