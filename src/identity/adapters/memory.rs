//! In-memory identity adapters for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{Caller, EmailAddress, User, UserId, Username},
    ports::{
        AuthenticationError, Authenticator, IdentityStore, IdentityStoreError, IdentityStoreResult,
    },
};

/// Thread-safe in-memory identity store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    users: HashMap<UserId, User>,
    email_index: HashMap<EmailAddress, UserId>,
    username_index: HashMap<Username, UserId>,
}

impl InMemoryIdentityStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> IdentityStoreError {
    IdentityStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn insert(&self, user: &User) -> IdentityStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.email_index.contains_key(user.email()) {
            return Err(IdentityStoreError::DuplicateEmail(user.email().clone()));
        }
        if state.username_index.contains_key(user.username()) {
            return Err(IdentityStoreError::DuplicateUsername(
                user.username().clone(),
            ));
        }

        state.email_index.insert(user.email().clone(), user.id());
        state
            .username_index
            .insert(user.username().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> IdentityStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous = state
            .users
            .get(&user.id())
            .ok_or(IdentityStoreError::NotFound(user.id()))?
            .clone();
        let email_taken = state
            .email_index
            .get(user.email())
            .is_some_and(|owner| *owner != user.id());
        if email_taken {
            return Err(IdentityStoreError::DuplicateEmail(user.email().clone()));
        }
        let username_taken = state
            .username_index
            .get(user.username())
            .is_some_and(|owner| *owner != user.id());
        if username_taken {
            return Err(IdentityStoreError::DuplicateUsername(
                user.username().clone(),
            ));
        }

        state.email_index.remove(previous.email());
        state.username_index.remove(previous.username());
        state.email_index.insert(user.email().clone(), user.id());
        state
            .username_index
            .insert(user.username().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> IdentityStoreResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityStoreResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> IdentityStoreResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .username_index
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn list_all(&self) -> IdentityStoreResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.username().as_str().cmp(b.username().as_str()));
        Ok(users)
    }

    async fn search(
        &self,
        query: &str,
        exclude: &[UserId],
        limit: usize,
    ) -> IdentityStoreResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matches: Vec<User> = state
            .users
            .values()
            .filter(|user| !exclude.contains(&user.id()) && user.matches_query(query))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.username().as_str().cmp(b.username().as_str()));
        matches.truncate(limit);
        Ok(matches)
    }
}

/// Authenticator backed by a fixed credential-to-caller table.
///
/// A stand-in for the JWT-verifying collaborator in tests and examples.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: Arc<RwLock<HashMap<String, Caller>>>,
}

impl StaticTokenAuthenticator {
    /// Creates an authenticator with no known credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a credential for the given caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredential`] when the token
    /// table lock is poisoned.
    pub fn grant(
        &self,
        credential: impl Into<String>,
        caller: Caller,
    ) -> Result<(), AuthenticationError> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AuthenticationError::InvalidCredential)?;
        tokens.insert(credential.into(), caller);
        Ok(())
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> Result<Caller, AuthenticationError> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| AuthenticationError::InvalidCredential)?;
        tokens
            .get(credential)
            .copied()
            .ok_or(AuthenticationError::InvalidCredential)
    }
}
