//! Account directory and idempotent provisioning.
//!
//! Accounts come from deployment configuration (a seed file), not from an
//! end-user signup flow. Applying the same seed any number of times converges
//! to the same directory state.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Deserialize;
use uuid::Uuid;

use crate::{Principal, Role};

/// A provisioned account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    password: String,
    pub roles: Vec<Role>,
    pub superuser: bool,
    pub active: bool,
}

impl Account {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            username: self.username.clone(),
            roles: self.roles.clone(),
            superuser: self.superuser,
        }
    }
}

/// Seed entry for provisioning, loadable from a deployment config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSeed {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default)]
pub struct Directory {
    accounts: RwLock<HashMap<String, Account>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one seed entry.
    ///
    /// An existing username keeps its id and takes the seed's credentials,
    /// roles and flags; a new username gets a fresh id. Nothing is duplicated
    /// or partially overwritten.
    pub fn provision(&self, seed: AccountSeed) {
        // Every write is a single whole-value insert, so a poisoned guard
        // still holds a consistent map.
        let mut accounts = match self.accounts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = accounts
            .get(&seed.username)
            .map(|existing| existing.id)
            .unwrap_or_else(Uuid::now_v7);
        accounts.insert(
            seed.username.clone(),
            Account {
                id,
                username: seed.username,
                password: seed.password,
                roles: seed.roles,
                superuser: seed.superuser,
                active: seed.active,
            },
        );
    }

    pub fn provision_all(&self, seeds: impl IntoIterator<Item = AccountSeed>) {
        for seed in seeds {
            self.provision(seed);
        }
    }

    /// Verify credentials. `None` covers unknown usernames, wrong passwords
    /// and inactive accounts alike; callers must not tell those apart.
    pub fn verify(&self, username: &str, password: &str) -> Option<Account> {
        let accounts = self.accounts.read().ok()?;
        let account = accounts.get(username)?;
        if !account.active || account.password != password {
            return None;
        }
        Some(account.clone())
    }

    pub fn get(&self, username: &str) -> Option<Account> {
        self.accounts.read().ok()?.get(username).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(username: &str, roles: Vec<Role>) -> AccountSeed {
        AccountSeed {
            username: username.to_string(),
            password: "pw".to_string(),
            roles,
            superuser: false,
            active: true,
        }
    }

    #[test]
    fn verify_accepts_good_credentials_only() {
        let dir = Directory::new();
        dir.provision(seed("alice", vec![Role::Admin]));

        assert!(dir.verify("alice", "pw").is_some());
        assert!(dir.verify("alice", "wrong").is_none());
        assert!(dir.verify("bob", "pw").is_none());
    }

    #[test]
    fn inactive_accounts_cannot_authenticate() {
        let dir = Directory::new();
        let mut s = seed("carol", vec![Role::Reader]);
        s.active = false;
        dir.provision(s);

        assert!(dir.verify("carol", "pw").is_none());
        assert!(dir.get("carol").is_some());
    }

    #[test]
    fn provisioning_is_idempotent() {
        let dir = Directory::new();
        let seeds = vec![seed("alice", vec![Role::Admin]), seed("bob", vec![Role::Reader])];
        dir.provision_all(seeds.clone());
        let alice_id = dir.get("alice").unwrap().id;

        dir.provision_all(seeds);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get("alice").unwrap().id, alice_id);
    }

    #[test]
    fn reseeding_updates_roles_in_place() {
        let dir = Directory::new();
        dir.provision(seed("dave", vec![Role::Reader]));
        dir.provision(seed("dave", vec![Role::Editor]));

        let account = dir.get("dave").unwrap();
        assert_eq!(account.roles, vec![Role::Editor]);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn seed_deserializes_with_defaults() {
        let s: AccountSeed =
            serde_json::from_str(r#"{"username":"eve","password":"pw","roles":["Reader"]}"#)
                .unwrap();
        assert!(s.active);
        assert!(!s.superuser);
        assert_eq!(s.roles, vec![Role::Reader]);
    }
}
