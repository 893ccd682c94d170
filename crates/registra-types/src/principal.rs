//! Authenticated principals and roles.
//!
//! The core trusts the transport layer to resolve credentials into a
//! `Principal`; nothing below the transport re-validates identity.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Id;
use crate::status::UnknownStatus;

/// Role attached to a user at creation time. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Faculty,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Faculty => "faculty",
            Role::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            "student" => Ok(Role::Student),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Principal {
    /// The bootstrap admin, authenticated via the configured server token.
    /// Carries admin rights but has no user row.
    Bootstrap,
    /// A regular user, authenticated via their personal API token.
    User { id: Id, role: Role },
}

impl Principal {
    /// Effective role of the caller.
    pub fn role(&self) -> Role {
        match self {
            Principal::Bootstrap => Role::Admin,
            Principal::User { role, .. } => *role,
        }
    }

    /// User id, if the caller has a user row.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Principal::Bootstrap => None,
            Principal::User { id, .. } => Some(id),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}
