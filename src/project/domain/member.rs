//! Project-scoped roles and membership entries.

use super::ParseProjectRoleError;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role a user holds within one project.
///
/// Ordered by privilege: Owner > Admin > Member > Viewer. Project roles are
/// independent of the account's global role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    /// The project creator; exactly one per project, immutable.
    Owner,
    /// May manage membership and edit the project, but not grant Admin.
    Admin,
    /// May create and work on tasks.
    Member,
    /// Read-only participant.
    Viewer,
}

impl ProjectRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    /// Returns `true` for roles permitted to manage membership and edit
    /// project fields.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Returns `true` for roles permitted to create tasks.
    #[must_use]
    pub const fn can_contribute(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Member)
    }
}

impl TryFrom<&str> for ProjectRole {
    type Error = ParseProjectRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseProjectRoleError(value.to_owned())),
        }
    }
}

/// One entry in a project's members list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    user: UserId,
    role: ProjectRole,
    added_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a membership entry timestamped from the clock.
    #[must_use]
    pub fn new(user: UserId, role: ProjectRole, clock: &impl Clock) -> Self {
        Self {
            user,
            role,
            added_at: clock.utc(),
        }
    }

    /// Reconstructs a membership entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(user: UserId, role: ProjectRole, added_at: DateTime<Utc>) -> Self {
        Self {
            user,
            role,
            added_at,
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the member's project role.
    #[must_use]
    pub const fn role(&self) -> ProjectRole {
        self.role
    }

    /// Returns when the member was added.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub(crate) const fn set_role(&mut self, role: ProjectRole) {
        self.role = role;
    }
}

/// Canonical `{user, role}` input shape for membership payloads.
///
/// Boundary adapters must normalize whatever shape they accept into this
/// before the aggregate sees it; the guarded mutation methods take nothing
/// looser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSpec {
    /// The user to admit.
    pub user: UserId,
    /// The role to assign; defaults to [`ProjectRole::Member`] when the
    /// source payload omits one.
    pub role: ProjectRole,
}

impl MemberSpec {
    /// Creates a member specification.
    #[must_use]
    pub const fn new(user: UserId, role: ProjectRole) -> Self {
        Self { user, role }
    }
}
