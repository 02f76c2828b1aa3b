use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission tier assigned to a principal.
///
/// The vocabulary is closed on purpose: the policy only recognizes these
/// three tiers, and anything else coming in from tokens or seed files is
/// rejected at the edge instead of silently granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Editor,
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Editor => "Editor",
            Role::Reader => "Reader",
        }
    }

    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Reader];
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Editor" => Ok(Role::Editor),
            "Reader" => Ok(Role::Reader),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
