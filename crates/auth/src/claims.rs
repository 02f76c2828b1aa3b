use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Principal, Role};

/// Kind of token minted by the codec.
///
/// Refresh tokens can only be exchanged for new access tokens; presenting one
/// as a bearer credential is an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims model.
///
/// `iat`/`exp` are UNIX timestamps in seconds; expiry is enforced by the
/// codec during verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub superuser: bool,
    pub token_type: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Resolve the claims into a principal for authorization decisions.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub,
            username: self.username.clone(),
            roles: self.roles.clone(),
            superuser: self.superuser,
        }
    }
}
