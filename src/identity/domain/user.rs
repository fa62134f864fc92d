//! User aggregate and caller identity types.

use super::{EmailAddress, IdentityDomainError, ParseGlobalRoleError, UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Application-wide role attached to a user account.
///
/// Distinct from project-scoped roles: a global `Admin` administers the
/// deployment (user listing and management), not any particular project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Deployment administrator.
    Admin,
    /// Regular account.
    User,
}

impl GlobalRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl TryFrom<&str> for GlobalRole {
    type Error = ParseGlobalRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(ParseGlobalRoleError(value.to_owned())),
        }
    }
}

/// Trusted caller identity supplied by the [`Authenticator`] collaborator.
///
/// The core treats this as the authenticated actor for every operation;
/// credential validation and expiry are the authenticator's concern.
///
/// [`Authenticator`]: crate::identity::ports::Authenticator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's global role.
    pub global_role: GlobalRole,
}

impl Caller {
    /// Creates a caller identity.
    #[must_use]
    pub const fn new(user_id: UserId, global_role: GlobalRole) -> Self {
        Self {
            user_id,
            global_role,
        }
    }

    /// Returns `true` when the caller is a deployment administrator.
    #[must_use]
    pub const fn is_global_admin(self) -> bool {
        matches!(self.global_role, GlobalRole::Admin)
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    username: Username,
    full_name: String,
    password_hash: String,
    global_role: GlobalRole,
    email_verified: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted username.
    pub username: Username,
    /// Persisted display name.
    pub full_name: String,
    /// Persisted opaque password credential.
    pub password_hash: String,
    /// Persisted global role.
    pub global_role: GlobalRole,
    /// Persisted email-verification state.
    pub email_verified: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Field-level profile edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfileEdit {
    /// Replacement display name.
    pub full_name: Option<String>,
    /// Replacement email address.
    pub email: Option<EmailAddress>,
    /// Replacement username.
    pub username: Option<Username>,
}

impl User {
    /// Creates a new unverified user account with the default `User` role.
    ///
    /// The password credential is opaque to the core; hashing is the
    /// responsibility of the authentication collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyFullName`] when the display name
    /// is empty after trimming.
    pub fn register(
        email: EmailAddress,
        username: Username,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, IdentityDomainError> {
        let name = full_name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(IdentityDomainError::EmptyFullName);
        }

        Ok(Self {
            id: UserId::new(),
            email,
            username,
            full_name: trimmed.to_owned(),
            password_hash: password_hash.into(),
            global_role: GlobalRole::User,
            email_verified: false,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            username: data.username,
            full_name: data.full_name,
            password_hash: data.password_hash,
            global_role: data.global_role,
            email_verified: data.email_verified,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the opaque password credential.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the global role.
    #[must_use]
    pub const fn global_role(&self) -> GlobalRole {
        self.global_role
    }

    /// Returns `true` once the account's email has been verified.
    #[must_use]
    pub const fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the account's email as verified.
    pub const fn mark_email_verified(&mut self) {
        self.email_verified = true;
    }

    /// Applies a profile edit, field by field.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyFullName`] when the replacement
    /// display name is empty after trimming; no field is changed in that
    /// case.
    pub fn update_profile(&mut self, edit: UserProfileEdit) -> Result<(), IdentityDomainError> {
        if let Some(name) = edit.full_name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(IdentityDomainError::EmptyFullName);
            }
            self.full_name = trimmed.to_owned();
        }
        if let Some(email) = edit.email {
            self.email = email;
        }
        if let Some(username) = edit.username {
            self.username = username;
        }
        Ok(())
    }

    /// Returns the caller identity for this user.
    #[must_use]
    pub const fn caller(&self) -> Caller {
        Caller::new(self.id, self.global_role)
    }

    /// Returns `true` when the query matches the full name, username, or
    /// email with a case-insensitive substring comparison.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.full_name.to_ascii_lowercase().contains(&needle)
            || self.username.as_str().to_ascii_lowercase().contains(&needle)
            || self.email.as_str().contains(&needle)
    }
}
