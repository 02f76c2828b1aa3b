//! Effective permission codenames surfaced by the identity endpoint.
//!
//! Codenames follow the `lossdesk.<action>_<model>` convention. They are
//! display/introspection data derived from the role set; the actual
//! allow/deny decision lives in [`crate::policy`].

use std::collections::BTreeSet;

use crate::{Principal, Role};

const APP_LABEL: &str = "lossdesk";

const ALL_MODELS: [&str; 5] = [
    "affectedarea",
    "cause",
    "department",
    "lossofproduction",
    "reportinglimitarea",
];

const LOOKUP_MODELS: [&str; 4] = ["affectedarea", "cause", "department", "reportinglimitarea"];

const ALL_ACTIONS: [&str; 4] = ["add", "change", "delete", "view"];

fn codename(action: &str, model: &str) -> String {
    format!("{APP_LABEL}.{action}_{model}")
}

/// Permission grants for one role.
///
/// The grant set is static data, so re-deriving it converges to the same
/// three roles with the same grants every time.
pub fn role_grants(role: Role) -> BTreeSet<String> {
    let mut grants = BTreeSet::new();
    match role {
        Role::Admin => {
            for model in ALL_MODELS {
                for action in ALL_ACTIONS {
                    grants.insert(codename(action, model));
                }
            }
        }
        Role::Editor => {
            for action in ALL_ACTIONS {
                grants.insert(codename(action, "lossofproduction"));
            }
            for model in LOOKUP_MODELS {
                grants.insert(codename("view", model));
            }
        }
        Role::Reader => {
            for model in ALL_MODELS {
                grants.insert(codename("view", model));
            }
        }
    }
    grants
}

/// Union of grants across the principal's role set.
///
/// Superusers get the full grant set outright.
pub fn effective_permissions(principal: &Principal) -> BTreeSet<String> {
    if principal.superuser {
        return role_grants(Role::Admin);
    }
    principal
        .roles
        .iter()
        .flat_map(|role| role_grants(*role))
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn principal(roles: Vec<Role>, superuser: bool) -> Principal {
        Principal {
            id: Uuid::now_v7(),
            username: "worker".to_string(),
            roles,
            superuser,
        }
    }

    #[test]
    fn admin_holds_every_codename() {
        let grants = role_grants(Role::Admin);
        assert_eq!(grants.len(), 20);
        assert!(grants.contains("lossdesk.delete_department"));
        assert!(grants.contains("lossdesk.view_lossofproduction"));
    }

    #[test]
    fn editor_writes_loss_records_only() {
        let grants = role_grants(Role::Editor);
        assert!(grants.contains("lossdesk.add_lossofproduction"));
        assert!(grants.contains("lossdesk.delete_lossofproduction"));
        assert!(grants.contains("lossdesk.view_department"));
        assert!(!grants.contains("lossdesk.add_department"));
        assert!(!grants.contains("lossdesk.change_cause"));
        assert_eq!(grants.len(), 8);
    }

    #[test]
    fn reader_views_everything_writes_nothing() {
        let grants = role_grants(Role::Reader);
        assert_eq!(grants.len(), 5);
        assert!(grants.iter().all(|g| g.contains(".view_")));
    }

    #[test]
    fn effective_set_is_the_union() {
        let p = principal(vec![Role::Editor, Role::Reader], false);
        let effective = effective_permissions(&p);
        assert!(effective.contains("lossdesk.add_lossofproduction"));
        assert!(effective.contains("lossdesk.view_cause"));
        assert!(!effective.contains("lossdesk.add_cause"));
    }

    #[test]
    fn superuser_gets_full_set_without_roles() {
        let p = principal(vec![], true);
        assert_eq!(effective_permissions(&p), role_grants(Role::Admin));
    }

    #[test]
    fn no_roles_means_no_grants() {
        let p = principal(vec![], false);
        assert!(effective_permissions(&p).is_empty());
    }
}
