//! Identity store port for user persistence and lookup.

use crate::identity::domain::{EmailAddress, User, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity store operations.
pub type IdentityStoreResult<T> = Result<T, IdentityStoreError>;

/// User persistence contract.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Stores a new user record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::DuplicateEmail`] or
    /// [`IdentityStoreError::DuplicateUsername`] when the unique contact
    /// fields collide with an existing record.
    async fn insert(&self, user: &User) -> IdentityStoreResult<()>;

    /// Persists changes to an existing user record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityStoreError::NotFound`] when the user does not exist,
    /// and [`IdentityStoreError::DuplicateEmail`] or
    /// [`IdentityStoreError::DuplicateUsername`] when a changed contact field
    /// collides with another record.
    async fn update(&self, user: &User) -> IdentityStoreResult<()>;

    /// Finds a user by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: UserId) -> IdentityStoreResult<Option<User>>;

    /// Finds a user by email address. Returns `None` when absent.
    async fn find_by_email(&self, email: &EmailAddress) -> IdentityStoreResult<Option<User>>;

    /// Finds a user by username. Returns `None` when absent.
    async fn find_by_username(&self, username: &Username) -> IdentityStoreResult<Option<User>>;

    /// Returns every stored user.
    async fn list_all(&self) -> IdentityStoreResult<Vec<User>>;

    /// Returns up to `limit` users matching `query` (case-insensitive
    /// substring over full name, username, and email), skipping any user in
    /// `exclude`.
    async fn search(
        &self,
        query: &str,
        exclude: &[UserId],
        limit: usize,
    ) -> IdentityStoreResult<Vec<User>>;
}

/// Errors returned by identity store implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityStoreError {
    /// A user with the same email address already exists.
    #[error("email address already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// A user with the same username already exists.
    #[error("username already taken: {0}")]
    DuplicateUsername(Username),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
