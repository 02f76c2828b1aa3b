use uuid::Uuid;

use crate::Role;

/// A fully resolved, authenticated principal for authorization decisions.
///
/// Construction is decoupled from transport: the API layer derives this from
/// verified token claims, tests build it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    pub superuser: bool,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
