//! Principals and their roles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::PrincipalId;

/// Role of an authenticated actor.
///
/// Only `Administrator` carries extra privileges in the authorization
/// policy; `Member` and `Guardian` differ at the presentation layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account holder.
    Member,
    /// Supervising account holder.
    Guardian,
    /// Full administrative access.
    Administrator,
}

impl Role {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "guardian" => Some(Self::Guardian),
            "administrator" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Guardian => "guardian",
            Self::Administrator => "administrator",
        }
    }

    /// Returns true for the administrator role.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor as seen by the engine.
///
/// Ownership of the full user entity (credentials, profile) lives outside
/// the core; only the id, role, and active flag are read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier.
    pub id: PrincipalId,
    /// Role in the authorization policy.
    pub role: Role,
    /// Inactive principals are denied every operation.
    pub active: bool,
}

impl Principal {
    /// Creates an active principal with the given role.
    #[must_use]
    pub fn new(id: PrincipalId, role: Role) -> Self {
        Self {
            id,
            role,
            active: true,
        }
    }

    /// Returns true if this principal is an active administrator.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.active && self.role.is_administrator()
    }
}
