//! Role to permission catalog and the fail-closed evaluator built on it.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Permission, Role, UserIdentity};

static NO_PERMISSIONS: BTreeSet<Permission> = BTreeSet::new();

/// Immutable mapping of every role to the permissions it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    roles: BTreeMap<Role, BTreeSet<Permission>>,
}

/// A permission held by a junior role but missing from a senior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyViolation {
    /// Role expected to hold a superset.
    pub senior: Role,
    /// Role holding the permission.
    pub junior: Role,
    /// Permission missing from the senior role.
    pub permission: Permission,
}

impl PermissionCatalog {
    /// Returns the catalog enforced by the API.
    #[must_use]
    pub fn standard() -> Self {
        use Permission::*;

        Self::from_entries([
            (
                Role::Admin,
                vec![
                    TasksCreate,
                    TasksRead,
                    TasksUpdate,
                    TasksDelete,
                    TasksAssign,
                    TasksReadAll,
                    TasksUpdateAll,
                    TasksDeleteAll,
                    UsersRead,
                    UsersUpdate,
                    UsersCreate,
                    UsersDelete,
                    UsersManageRoles,
                    ReportsView,
                    ReportsExport,
                    SystemSettings,
                ],
            ),
            (
                Role::Manager,
                vec![
                    TasksRead,
                    TasksUpdate,
                    TasksDelete,
                    TasksAssign,
                    TasksReadAll,
                    TasksUpdateAll,
                    TasksDeleteAll,
                    UsersRead,
                    ReportsView,
                    ReportsExport,
                ],
            ),
            (
                Role::User,
                vec![TasksRead, TasksUpdate, TasksDelete, TasksAssign],
            ),
        ])
    }

    /// Builds a catalog from explicit role entries. Roles without an entry grant nothing.
    #[must_use]
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = Permission>,
    {
        let mut roles = BTreeMap::new();
        for (role, permissions) in entries {
            roles
                .entry(role)
                .or_insert_with(BTreeSet::new)
                .extend(permissions);
        }

        Self { roles }
    }

    /// Returns the permissions granted to a role.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        self.roles.get(&role).unwrap_or(&NO_PERMISSIONS)
    }

    /// Returns the permissions granted to a role name. Unknown names grant nothing.
    #[must_use]
    pub fn permissions_for_name(&self, role_name: &str) -> &BTreeSet<Permission> {
        Role::from_str(role_name)
            .map(|role| self.permissions_for(role))
            .unwrap_or(&NO_PERMISSIONS)
    }

    /// Returns whether the role grants the permission.
    #[must_use]
    pub fn allows(&self, role: Role, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }

    /// Lists every place where admin ⊇ manager ⊇ user does not hold.
    #[must_use]
    pub fn hierarchy_violations(&self) -> Vec<HierarchyViolation> {
        const CHAIN: [(Role, Role); 2] = [(Role::Admin, Role::Manager), (Role::Manager, Role::User)];

        CHAIN
            .iter()
            .flat_map(|(senior, junior)| {
                let senior_permissions = self.permissions_for(*senior);
                self.permissions_for(*junior)
                    .iter()
                    .filter(move |permission| !senior_permissions.contains(permission))
                    .map(move |permission| HierarchyViolation {
                        senior: *senior,
                        junior: *junior,
                        permission: *permission,
                    })
            })
            .collect()
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Answers permission questions for an optional identity.
///
/// Every check fails closed: an absent identity, an unknown role name or an
/// unknown permission name is never granted anything.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    catalog: Arc<PermissionCatalog>,
}

impl PermissionEvaluator {
    /// Creates an evaluator over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the catalog backing this evaluator.
    #[must_use]
    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        &self.catalog
    }

    /// Returns whether the identity holds the permission.
    #[must_use]
    pub fn has_permission(&self, identity: Option<&UserIdentity>, permission: Permission) -> bool {
        match identity {
            Some(identity) => self.catalog.allows(identity.role(), permission),
            None => false,
        }
    }

    /// Returns whether the identity holds the permission named by a transport string.
    #[must_use]
    pub fn has_permission_named(&self, identity: Option<&UserIdentity>, permission: &str) -> bool {
        Permission::from_str(permission)
            .map(|permission| self.has_permission(identity, permission))
            .unwrap_or(false)
    }

    /// Returns whether a role name grants the permission.
    #[must_use]
    pub fn role_name_has_permission(&self, role_name: &str, permission: Permission) -> bool {
        self.catalog
            .permissions_for_name(role_name)
            .contains(&permission)
    }

    /// Returns whether the identity holds at least one of the permissions.
    #[must_use]
    pub fn has_any(&self, identity: Option<&UserIdentity>, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission(identity, *permission))
    }

    /// Returns whether the identity holds every one of the permissions.
    #[must_use]
    pub fn has_all(&self, identity: Option<&UserIdentity>, permissions: &[Permission]) -> bool {
        match identity {
            Some(identity) => permissions
                .iter()
                .all(|permission| self.catalog.allows(identity.role(), *permission)),
            None => false,
        }
    }

    /// Name-based variant of [`Self::has_any`].
    #[must_use]
    pub fn has_any_named(&self, identity: Option<&UserIdentity>, permissions: &[&str]) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission_named(identity, permission))
    }

    /// Name-based variant of [`Self::has_all`].
    #[must_use]
    pub fn has_all_named(&self, identity: Option<&UserIdentity>, permissions: &[&str]) -> bool {
        identity.is_some()
            && permissions
                .iter()
                .all(|permission| self.has_permission_named(identity, permission))
    }

    /// Returns whether the identity's role is in the allow-list.
    #[must_use]
    pub fn has_role(&self, identity: Option<&UserIdentity>, roles: &[Role]) -> bool {
        identity.is_some_and(|identity| roles.contains(&identity.role()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::{PermissionCatalog, PermissionEvaluator};
    use crate::{EmailAddress, Permission, Role, UserId, UserIdentity};

    fn identity(role: Role) -> UserIdentity {
        let email = EmailAddress::new("actor@example.com")
            .unwrap_or_else(|_| panic!("test email must be valid"));
        UserIdentity::new(UserId::new(), "Actor", email, role)
    }

    fn evaluator() -> PermissionEvaluator {
        PermissionEvaluator::new(Arc::new(PermissionCatalog::standard()))
    }

    fn permission_strategy() -> impl Strategy<Value = Permission> {
        proptest::sample::select(Permission::all().to_vec())
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        proptest::sample::select(Role::all().to_vec())
    }

    #[test]
    fn standard_catalog_matches_enforced_policy() {
        let catalog = PermissionCatalog::standard();
        assert_eq!(catalog.permissions_for(Role::Admin).len(), Permission::all().len());
        assert!(catalog.allows(Role::User, Permission::TasksDelete));
        assert!(!catalog.allows(Role::User, Permission::TasksCreate));
        assert!(!catalog.allows(Role::Manager, Permission::TasksCreate));
        assert!(!catalog.allows(Role::Manager, Permission::UsersDelete));
    }

    #[test]
    fn standard_catalog_is_monotonic() {
        assert!(PermissionCatalog::standard().hierarchy_violations().is_empty());
    }

    #[test]
    fn hierarchy_violations_are_reported() {
        let catalog = PermissionCatalog::from_entries([
            (Role::Admin, vec![Permission::TasksRead]),
            (Role::Manager, vec![Permission::TasksRead, Permission::TasksCreate]),
            (Role::User, vec![Permission::TasksRead]),
        ]);

        let violations = catalog.hierarchy_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].senior, Role::Admin);
        assert_eq!(violations[0].junior, Role::Manager);
        assert_eq!(violations[0].permission, Permission::TasksCreate);
    }

    #[test]
    fn missing_role_entry_grants_nothing() {
        let catalog = PermissionCatalog::from_entries([(Role::Admin, vec![Permission::TasksRead])]);
        assert!(catalog.permissions_for(Role::User).is_empty());
    }

    #[test]
    fn absent_identity_is_always_denied() {
        let evaluator = evaluator();
        assert!(!evaluator.has_permission(None, Permission::TasksRead));
        assert!(!evaluator.has_permission_named(None, "tasks:read"));
        assert!(!evaluator.has_any(None, &[Permission::TasksRead]));
        assert!(!evaluator.has_all(None, &[]));
        assert!(!evaluator.has_all_named(None, &[]));
        assert!(!evaluator.has_role(None, Role::all()));
    }

    #[test]
    fn unknown_permission_name_is_denied_even_for_admin() {
        let admin = identity(Role::Admin);
        assert!(!evaluator().has_permission_named(Some(&admin), "tasks:archive"));
        assert!(!evaluator().has_any_named(Some(&admin), &["tasks:archive", "tasks:*"]));
    }

    #[test]
    fn has_all_of_nothing_holds_for_present_identity() {
        let user = identity(Role::User);
        assert!(evaluator().has_all(Some(&user), &[]));
        assert!(!evaluator().has_any(Some(&user), &[]));
    }

    #[test]
    fn manager_cannot_delete_users() {
        let manager = identity(Role::Manager);
        assert!(!evaluator().has_permission(Some(&manager), Permission::UsersDelete));
        assert!(evaluator().has_permission(Some(&manager), Permission::ReportsExport));
    }

    proptest! {
        #[test]
        fn unknown_role_names_hold_no_permission(
            role_name in "[a-z]{1,12}",
            permission in permission_strategy(),
        ) {
            prop_assume!(!["admin", "manager", "user"].contains(&role_name.as_str()));
            prop_assert!(!evaluator().role_name_has_permission(&role_name, permission));
        }

        #[test]
        fn admin_holds_every_catalog_permission(permission in permission_strategy()) {
            let evaluator = evaluator();
            let admin = identity(Role::Admin);
            if evaluator.catalog().permissions_for(Role::Admin).contains(&permission) {
                prop_assert!(evaluator.has_permission(Some(&admin), permission));
            }
        }

        #[test]
        fn any_and_all_match_boolean_composition(
            role in role_strategy(),
            first in permission_strategy(),
            second in permission_strategy(),
        ) {
            let evaluator = evaluator();
            let actor = identity(role);
            let first_held = evaluator.has_permission(Some(&actor), first);
            let second_held = evaluator.has_permission(Some(&actor), second);

            prop_assert_eq!(
                evaluator.has_any(Some(&actor), &[first, second]),
                first_held || second_held
            );
            prop_assert_eq!(
                evaluator.has_all(Some(&actor), &[first, second]),
                first_held && second_held
            );
        }
    }
}
