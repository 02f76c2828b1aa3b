//! `lossdesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the policy is
//! a deterministic function over in-memory values, and the token codec only
//! ever sees byte strings.

pub mod claims;
pub mod directory;
pub mod jwt;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod roles;

pub use claims::{Claims, TokenKind};
pub use directory::{Account, AccountSeed, Directory};
pub use jwt::{Hs256Tokens, TokenError, TokenPair};
pub use permissions::{effective_permissions, role_grants};
pub use policy::{Action, AuthzError, Decision, Target, authorize, decide, fields_read_only};
pub use principal::Principal;
pub use roles::{Role, UnknownRole};
