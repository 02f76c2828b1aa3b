//! The permission decision table.
//!
//! Decides, for every request, whether the acting principal may perform an
//! operation on an entity category:
//!
//! | role      | lookup read | lookup write | loss read | loss write |
//! |-----------|-------------|--------------|-----------|------------|
//! | superuser | allow       | allow        | allow     | allow      |
//! | Admin     | allow       | allow        | allow     | allow      |
//! | Editor    | allow       | deny         | allow     | allow      |
//! | Reader    | allow       | deny         | allow     | deny       |
//! | (none)    | deny        | deny         | deny      | deny       |
//!
//! A principal may hold several roles; the most permissive one wins. The
//! fallback for an empty or unrecognized role set is deny.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use thiserror::Error;

use crate::{Principal, Role};

/// The conventional operations exposed per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_read(&self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// Entity category being acted upon.
///
/// The four classification tables share one category; loss events are the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Lookup,
    LossEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("you do not have permission to perform this action")]
    Forbidden,
}

/// Evaluate the decision table for one request.
pub fn decide(principal: &Principal, action: Action, target: Target) -> Decision {
    if principal.superuser || principal.has_role(Role::Admin) {
        return Decision::Allow;
    }

    let granted = match target {
        Target::Lookup => {
            action.is_read() && (principal.has_role(Role::Editor) || principal.has_role(Role::Reader))
        }
        Target::LossEvent => {
            principal.has_role(Role::Editor)
                || (action.is_read() && principal.has_role(Role::Reader))
        }
    };

    if granted { Decision::Allow } else { Decision::Deny }
}

/// `decide`, surfaced as a `Result` for call sites that gate an operation.
pub fn authorize(principal: &Principal, action: Action, target: Target) -> Result<(), AuthzError> {
    match decide(principal, action, target) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AuthzError::Forbidden),
    }
}

/// Record-editing surface: every field renders read-only exactly when the
/// principal's update decision for the target is deny. A stricter read path,
/// not a second policy.
pub fn fields_read_only(principal: &Principal, target: Target) -> bool {
    decide(principal, Action::Update, target) == Decision::Deny
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use uuid::Uuid;

    use super::*;

    const ALL_ACTIONS: [Action; 5] = [
        Action::List,
        Action::Retrieve,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];
    const WRITES: [Action; 3] = [Action::Create, Action::Update, Action::Delete];
    const TARGETS: [Target; 2] = [Target::Lookup, Target::LossEvent];

    fn principal(roles: Vec<Role>, superuser: bool) -> Principal {
        Principal {
            id: Uuid::now_v7(),
            username: "worker".to_string(),
            roles,
            superuser,
        }
    }

    #[test]
    fn admin_allowed_everywhere() {
        let p = principal(vec![Role::Admin], false);
        for action in ALL_ACTIONS {
            for target in TARGETS {
                assert_eq!(decide(&p, action, target), Decision::Allow);
            }
        }
    }

    #[test]
    fn superuser_bypasses_roles() {
        let p = principal(vec![], true);
        for action in ALL_ACTIONS {
            for target in TARGETS {
                assert_eq!(decide(&p, action, target), Decision::Allow);
            }
        }
    }

    #[test]
    fn editor_writes_loss_events_but_not_lookups() {
        let p = principal(vec![Role::Editor], false);
        for action in WRITES {
            assert_eq!(decide(&p, action, Target::LossEvent), Decision::Allow);
            assert_eq!(decide(&p, action, Target::Lookup), Decision::Deny);
        }
        assert_eq!(decide(&p, Action::List, Target::Lookup), Decision::Allow);
        assert_eq!(decide(&p, Action::Retrieve, Target::Lookup), Decision::Allow);
    }

    #[test]
    fn reader_is_read_only() {
        let p = principal(vec![Role::Reader], false);
        for target in TARGETS {
            assert_eq!(decide(&p, Action::List, target), Decision::Allow);
            assert_eq!(decide(&p, Action::Retrieve, target), Decision::Allow);
            for action in WRITES {
                assert_eq!(decide(&p, action, target), Decision::Deny);
            }
        }
    }

    #[test]
    fn empty_role_set_denied_everywhere() {
        let p = principal(vec![], false);
        for action in ALL_ACTIONS {
            for target in TARGETS {
                assert_eq!(decide(&p, action, target), Decision::Deny);
            }
        }
    }

    #[test]
    fn most_permissive_role_wins() {
        let p = principal(vec![Role::Reader, Role::Editor], false);
        assert_eq!(decide(&p, Action::Create, Target::LossEvent), Decision::Allow);

        let p = principal(vec![Role::Reader, Role::Admin], false);
        assert_eq!(decide(&p, Action::Delete, Target::Lookup), Decision::Allow);
    }

    #[test]
    fn authorize_maps_deny_to_forbidden() {
        let p = principal(vec![Role::Reader], false);
        assert_eq!(
            authorize(&p, Action::Delete, Target::LossEvent),
            Err(AuthzError::Forbidden)
        );
        assert!(authorize(&p, Action::List, Target::LossEvent).is_ok());
    }

    #[test]
    fn fields_follow_the_update_decision() {
        let reader = principal(vec![Role::Reader], false);
        assert!(fields_read_only(&reader, Target::Lookup));
        assert!(fields_read_only(&reader, Target::LossEvent));

        let editor = principal(vec![Role::Editor], false);
        assert!(fields_read_only(&editor, Target::Lookup));
        assert!(!fields_read_only(&editor, Target::LossEvent));

        let admin = principal(vec![Role::Admin], false);
        assert!(!fields_read_only(&admin, Target::Lookup));
    }

    fn role_set() -> impl Strategy<Value = Vec<Role>> {
        proptest::collection::vec(
            prop_oneof![Just(Role::Admin), Just(Role::Editor), Just(Role::Reader)],
            0..=3,
        )
    }

    proptest! {
        /// Without Admin (or superuser) in the set, every lookup write is
        /// denied, no matter which other roles are held.
        #[test]
        fn lookup_writes_require_admin(roles in role_set()) {
            prop_assume!(!roles.contains(&Role::Admin));
            let p = principal(roles, false);
            for action in WRITES {
                prop_assert_eq!(decide(&p, action, Target::Lookup), Decision::Deny);
            }
        }

        /// Any set containing Admin allows every operation on every target.
        #[test]
        fn admin_in_set_allows_all(mut roles in role_set()) {
            roles.push(Role::Admin);
            let p = principal(roles, false);
            for action in ALL_ACTIONS {
                for target in TARGETS {
                    prop_assert_eq!(decide(&p, action, target), Decision::Allow);
                }
            }
        }

        /// Reads never require more than one recognized role.
        #[test]
        fn any_recognized_role_can_read(roles in role_set()) {
            prop_assume!(!roles.is_empty());
            let p = principal(roles, false);
            for target in TARGETS {
                prop_assert_eq!(decide(&p, Action::List, target), Decision::Allow);
                prop_assert_eq!(decide(&p, Action::Retrieve, target), Decision::Allow);
            }
        }

        /// Loss-event writes require Admin or Editor.
        #[test]
        fn loss_writes_require_admin_or_editor(roles in role_set()) {
            let p = principal(roles.clone(), false);
            let expected = if roles.contains(&Role::Admin) || roles.contains(&Role::Editor) {
                Decision::Allow
            } else {
                Decision::Deny
            };
            for action in WRITES {
                prop_assert_eq!(decide(&p, action, Target::LossEvent), expected);
            }
        }
    }
}
