//! Authorization roles and their fixed precedence.
//!
//! Roles are mutually exclusive: a user id belongs to at most one role
//! group at any time (best-effort, see the coordinator). A user found in
//! no role group is [`Role::Anonymous`].

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Authorization role, ordered by precedence: `Admin` is highest,
/// `Anonymous` (absence from all role groups) lowest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    Restricted,
    Default,
    Admin,
}

impl Role {
    /// Roles backed by a role group, highest precedence first.
    pub const GRANTABLE: [Role; 3] = [Role::Admin, Role::Default, Role::Restricted];

    /// Parse a role name, case-insensitively.
    ///
    /// Only group-backed roles have names; `anonymous` is the absence of
    /// a role and cannot be requested by name.
    pub fn from_name(name: &str) -> Result<Role, ValidationError> {
        match name.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "default" => Ok(Role::Default),
            "restricted" => Ok(Role::Restricted),
            _ => Err(ValidationError::new(
                "role",
                "unknown",
                format!("unknown role: {name}"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Default => "default",
            Role::Restricted => "restricted",
            Role::Anonymous => "anonymous",
        }
    }

    /// Authority containment: whether a holder of `self` covers the
    /// authority of `other`. Anonymous neither covers nor is covered.
    pub fn supports(self, other: Role) -> bool {
        self != Role::Anonymous && other != Role::Anonymous && self >= other
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
