use std::sync::Arc;

use taskpro_core::AppResult;
use taskpro_domain::{
    Permission, PermissionCatalog, PermissionEvaluator, Role, UserId, UserIdentity,
};

use crate::AuthFailure;

/// Application service for role-based authorization guards.
///
/// Every guard takes the actor as `Option` so that a missing identity is
/// rejected here instead of being treated as an implicit pass.
#[derive(Clone)]
pub struct AuthorizationService {
    evaluator: PermissionEvaluator,
}

impl AuthorizationService {
    /// Creates a new authorization service over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        Self {
            evaluator: PermissionEvaluator::new(catalog),
        }
    }

    /// Returns the evaluator backing the guards.
    #[must_use]
    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// Returns the catalog backing the guards.
    #[must_use]
    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        self.evaluator.catalog()
    }

    /// Returns whether the actor currently has the permission.
    #[must_use]
    pub fn has_permission(&self, actor: Option<&UserIdentity>, permission: Permission) -> bool {
        self.evaluator.has_permission(actor, permission)
    }

    /// Rejects unless the actor's role is in the allow-list.
    ///
    /// Prefer the permission guards; this exists for routes that predate them.
    pub fn require_role(&self, actor: Option<&UserIdentity>, roles: &[Role]) -> AppResult<()> {
        let actor = authenticated(actor)?;
        if self.evaluator.has_role(Some(actor), roles) {
            return Ok(());
        }

        Err(AuthFailure::PermissionDenied.into())
    }

    /// Ensures the actor has the required permission.
    pub fn require_permission(
        &self,
        actor: Option<&UserIdentity>,
        permission: Permission,
    ) -> AppResult<()> {
        let actor = authenticated(actor)?;
        if self.evaluator.has_permission(Some(actor), permission) {
            return Ok(());
        }

        Err(AuthFailure::PermissionDenied.into())
    }

    /// Ensures the actor has at least one of the permissions.
    pub fn require_any(
        &self,
        actor: Option<&UserIdentity>,
        permissions: &[Permission],
    ) -> AppResult<()> {
        let actor = authenticated(actor)?;
        if self.evaluator.has_any(Some(actor), permissions) {
            return Ok(());
        }

        Err(AuthFailure::PermissionDenied.into())
    }

    /// Ensures the actor has every one of the permissions.
    pub fn require_all(
        &self,
        actor: Option<&UserIdentity>,
        permissions: &[Permission],
    ) -> AppResult<()> {
        let actor = authenticated(actor)?;
        if self.evaluator.has_all(Some(actor), permissions) {
            return Ok(());
        }

        Err(AuthFailure::PermissionDenied.into())
    }

    /// Allows the resource owner, otherwise falls back to the permission guard.
    ///
    /// An unknown owner never matches.
    pub fn require_owner_or_permission(
        &self,
        actor: Option<&UserIdentity>,
        owner: Option<UserId>,
        permission: Permission,
    ) -> AppResult<()> {
        let actor = authenticated(actor)?;
        if owner.is_some_and(|owner| owner == actor.id()) {
            return Ok(());
        }

        self.require_permission(Some(actor), permission)
    }
}

fn authenticated(actor: Option<&UserIdentity>) -> Result<&UserIdentity, AuthFailure> {
    actor.ok_or(AuthFailure::AuthenticationRequired)
}
