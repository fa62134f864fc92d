//! Service layer for account registration and the user directory.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{Caller, EmailAddress, IdentityDomainError, User, UserId, UserProfileEdit, Username},
    ports::{IdentityStore, IdentityStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    full_name: String,
    username: String,
    email: String,
    password_hash: String,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    ///
    /// The password credential must already be hashed by the authentication
    /// collaborator; the core never sees plaintext passwords.
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Request payload for updating a user's profile.
///
/// Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    full_name: Option<String>,
    email: Option<String>,
    username: Option<String>,
}

impl UpdateProfileRequest {
    /// Creates an empty profile edit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            full_name: None,
            email: None,
            username: None,
        }
    }

    /// Sets a replacement display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Sets a replacement email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a replacement username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// The caller may not perform this directory action.
    #[error("the caller may not perform this directory action")]
    Forbidden,

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] IdentityStoreError),
}

impl DirectoryError {
    /// Classifies the error for the operation boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidArgument,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Store(err) => match err {
                IdentityStoreError::DuplicateEmail(_)
                | IdentityStoreError::DuplicateUsername(_) => ErrorKind::Conflict,
                IdentityStoreError::NotFound(_) => ErrorKind::NotFound,
                IdentityStoreError::Persistence(_) => ErrorKind::Unavailable,
            },
        }
    }
}

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Account registration and user directory service.
#[derive(Clone)]
pub struct DirectoryService<S, C>
where
    S: IdentityStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> DirectoryService<S, C>
where
    S: IdentityStore,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Registers a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Domain`] when a field fails validation and
    /// [`DirectoryError::Store`] when the email or username is already taken.
    pub async fn register(&self, request: RegisterUserRequest) -> DirectoryResult<User> {
        let email = EmailAddress::new(request.email)?;
        let username = Username::new(request.username)?;
        let user = User::register(
            email,
            username,
            request.full_name,
            request.password_hash,
            &*self.clock,
        )?;
        self.store.insert(&user).await?;
        Ok(user)
    }

    /// Updates an account's profile fields.
    ///
    /// Users may edit their own profile; a global administrator may edit
    /// anyone's.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for any other caller,
    /// [`DirectoryError::Domain`] when a field fails validation, and
    /// [`DirectoryError::Store`] when the account is absent or the new email
    /// or username is already taken.
    pub async fn update_profile(
        &self,
        caller: Caller,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> DirectoryResult<User> {
        if caller.user_id != id && !caller.is_global_admin() {
            return Err(DirectoryError::Forbidden);
        }
        let mut user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(DirectoryError::Store(IdentityStoreError::NotFound(id)))?;

        let edit = UserProfileEdit {
            full_name: request.full_name,
            email: request.email.map(EmailAddress::new).transpose()?,
            username: request.username.map(Username::new).transpose()?,
        };
        user.update_profile(edit)?;
        self.store.update(&user).await?;
        Ok(user)
    }

    /// Lists every registered account. Restricted to global administrators.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for non-administrator callers.
    pub async fn list_users(&self, caller: Caller) -> DirectoryResult<Vec<User>> {
        if !caller.is_global_admin() {
            return Err(DirectoryError::Forbidden);
        }
        Ok(self.store.list_all().await?)
    }
}
