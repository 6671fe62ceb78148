//! Role resolution.
//!
//! At login, the identity provider reports the set of group (guild-role) ids the user holds in the
//! dealership's guild. This module maps that set onto a single application [`Role`] via a priority
//! table configured at startup.
//!
//! Evaluation order is fixed at construction time: owner, then manager, then customer. A
//! membership set matching several configured ids always resolves to the highest-privilege match,
//! no matter how the provider enumerated the memberships.

use std::collections::HashSet;

use log::warn;

use crate::db_types::Role;

/// An ordered mapping from application role to the provider-side group id that grants it.
///
/// Entries are evaluated strictly in descending privilege order. Unset or empty ids never match.
#[derive(Debug, Clone, Default)]
pub struct RolePriorityTable {
    entries: Vec<(Role, String)>,
}

impl RolePriorityTable {
    /// Build the table from the three configured guild-role ids. Empty ids are skipped, so a
    /// partially configured mapping degrades gracefully.
    pub fn new(owner_id: &str, manager_id: &str, customer_id: &str) -> Self {
        let entries = [(Role::Owner, owner_id), (Role::Manager, manager_id), (Role::Customer, customer_id)]
            .into_iter()
            .filter(|(_, id)| !id.is_empty())
            .map(|(role, id)| (role, id.to_string()))
            .collect::<Vec<_>>();
        if entries.is_empty() {
            warn!("🎭️ No role mapping is configured. All authenticated users will resolve to 'customer'.");
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a membership set to a single application role.
    ///
    /// * An unconfigured table resolves everything to [`Role::Customer`] so that an instance whose
    ///   role mapping has not been set up yet stays in its least-privileged useful state.
    /// * Otherwise the first configured id present in the set wins, in table order.
    /// * A non-empty set with no configured match is a plain guild [`Role::Member`]; an empty set
    ///   is a [`Role::Guest`].
    pub fn resolve(&self, memberships: &HashSet<String>) -> Role {
        if self.entries.is_empty() {
            return Role::Customer;
        }
        for (role, id) in &self.entries {
            if memberships.contains(id) {
                return *role;
            }
        }
        if memberships.is_empty() {
            Role::Guest
        } else {
            Role::Member
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::RolePriorityTable;
    use crate::db_types::Role;

    const OWNER: &str = "1182247506895798366";
    const MANAGER: &str = "1182247506895798365";
    const CUSTOMER: &str = "1182247506895798364";

    fn table() -> RolePriorityTable {
        RolePriorityTable::new(OWNER, MANAGER, CUSTOMER)
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn highest_priority_wins_regardless_of_set_order() {
        // A HashSet has no stable iteration order. Resolution must not depend on it.
        let memberships = set(&[MANAGER, OWNER, "999", CUSTOMER]);
        for _ in 0..50 {
            assert_eq!(table().resolve(&memberships), Role::Owner);
        }
    }

    #[test]
    fn manager_beats_customer() {
        assert_eq!(table().resolve(&set(&[CUSTOMER, MANAGER])), Role::Manager);
    }

    #[test]
    fn configured_customer_id_matches() {
        assert_eq!(table().resolve(&set(&[CUSTOMER])), Role::Customer);
    }

    #[test]
    fn unrecognised_memberships_resolve_to_member() {
        assert_eq!(table().resolve(&set(&["123", "456"])), Role::Member);
    }

    #[test]
    fn empty_membership_set_resolves_to_guest() {
        assert_eq!(table().resolve(&HashSet::new()), Role::Guest);
    }

    #[test]
    fn unconfigured_table_defaults_to_customer() {
        let empty = RolePriorityTable::new("", "", "");
        assert!(empty.is_empty());
        assert_eq!(empty.resolve(&set(&[OWNER])), Role::Customer);
        assert_eq!(empty.resolve(&HashSet::new()), Role::Customer);
    }

    #[test]
    fn duplicate_id_configured_for_two_roles_takes_the_higher() {
        // Configuring one group id for two roles is a configuration error; first match in
        // priority order still wins deterministically.
        let table = RolePriorityTable::new("dup", "dup", CUSTOMER);
        assert_eq!(table.resolve(&set(&["dup"])), Role::Owner);
    }

    #[test]
    fn empty_configured_id_never_matches() {
        // Only the owner mapping is configured; the manager id is blank and must be skipped.
        let partial = RolePriorityTable::new(OWNER, "", "");
        assert_eq!(partial.resolve(&set(&[OWNER])), Role::Owner);
        assert_eq!(partial.resolve(&set(&[""])), Role::Member);
    }
}
