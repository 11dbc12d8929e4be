use std::sync::Arc;

use taskpro_domain::{Permission, PermissionCatalog, PermissionEvaluator, Role};
use tracing::warn;

use crate::{ApiClient, SessionStore};

/// Rendering-time permission checks against the current session.
///
/// Fails closed when nobody is signed in. The API repeats every check.
#[derive(Clone)]
pub struct UiPermissions {
    evaluator: PermissionEvaluator,
}

impl UiPermissions {
    /// Creates checks over a catalog, usually the one served by the API.
    #[must_use]
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        Self {
            evaluator: PermissionEvaluator::new(catalog),
        }
    }

    /// Uses the catalog served by the API, or the built-in standard catalog
    /// when it cannot be fetched.
    pub async fn from_api(client: &ApiClient) -> Self {
        let catalog = match client.permissions().await {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!(error = %error, "permission catalog unavailable, using built-in copy");
                PermissionCatalog::standard()
            }
        };

        Self::new(Arc::new(catalog))
    }

    /// Returns whether the signed-in identity holds the permission.
    #[must_use]
    pub fn can(&self, session: &SessionStore, permission: Permission) -> bool {
        let identity = session.current_identity();
        self.evaluator.has_permission(identity.as_ref(), permission)
    }

    /// Name-based [`Self::can`]. Unknown names are never held.
    #[must_use]
    pub fn can_named(&self, session: &SessionStore, permission: &str) -> bool {
        let identity = session.current_identity();
        self.evaluator
            .has_permission_named(identity.as_ref(), permission)
    }

    /// Returns whether at least one permission is held.
    #[must_use]
    pub fn can_any(&self, session: &SessionStore, permissions: &[Permission]) -> bool {
        let identity = session.current_identity();
        self.evaluator.has_any(identity.as_ref(), permissions)
    }

    /// Returns whether every permission is held.
    #[must_use]
    pub fn can_all(&self, session: &SessionStore, permissions: &[Permission]) -> bool {
        let identity = session.current_identity();
        self.evaluator.has_all(identity.as_ref(), permissions)
    }

    /// Returns whether the signed-in identity has one of the roles.
    #[must_use]
    pub fn has_role(&self, session: &SessionStore, roles: &[Role]) -> bool {
        let identity = session.current_identity();
        self.evaluator.has_role(identity.as_ref(), roles)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskpro_core::SessionToken;
    use taskpro_domain::{EmailAddress, Permission, PermissionCatalog, Role, UserId, UserIdentity};

    use super::UiPermissions;
    use crate::{MemorySessionStorage, SessionStore};

    fn signed_in(role: Role) -> SessionStore {
        let store = SessionStore::load(Arc::new(MemorySessionStorage::new()));
        let identity = UserIdentity::new(
            UserId::new(),
            "Someone",
            EmailAddress::new("someone@example.com").unwrap_or_else(|_| panic!("email")),
            role,
        );
        assert!(store.set_session(SessionToken::new("t"), identity).is_ok());
        store
    }

    fn permissions() -> UiPermissions {
        UiPermissions::new(Arc::new(PermissionCatalog::standard()))
    }

    #[test]
    fn signed_out_session_holds_nothing() {
        let store = SessionStore::load(Arc::new(MemorySessionStorage::new()));
        let permissions = permissions();

        assert!(!permissions.can(&store, Permission::TasksRead));
        assert!(!permissions.can_all(&store, &[]));
        assert!(!permissions.has_role(&store, &[Role::User]));
    }

    #[test]
    fn manager_checks_follow_catalog() {
        let store = signed_in(Role::Manager);
        let permissions = permissions();

        assert!(permissions.can(&store, Permission::ReportsView));
        assert!(!permissions.can(&store, Permission::SystemSettings));
        assert!(permissions.can_named(&store, "tasks:read-all"));
        assert!(!permissions.can_named(&store, "tasks:teleport"));
        assert!(permissions.can_any(
            &store,
            &[Permission::SystemSettings, Permission::UsersRead]
        ));
        assert!(!permissions.can_all(
            &store,
            &[Permission::UsersRead, Permission::UsersManageRoles]
        ));
    }
}
