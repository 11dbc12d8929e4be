use taskpro_core::{AppError, AppResult};
use taskpro_domain::{Permission, Role, UserId, UserIdentity};

use super::UserService;

impl UserService {
    /// Lists every account. Requires `users:read`.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<UserIdentity>> {
        self.authorization_service
            .require_permission(Some(actor), Permission::UsersRead)?;

        let users = self.user_repository.list().await?;
        Ok(users.iter().map(|user| user.identity()).collect())
    }

    /// Changes another account's role. Requires `users:manage-roles`.
    pub async fn change_role(
        &self,
        actor: &UserIdentity,
        target: UserId,
        role: Role,
    ) -> AppResult<UserIdentity> {
        self.authorization_service
            .require_permission(Some(actor), Permission::UsersManageRoles)?;

        if target == actor.id() {
            return Err(AppError::Forbidden(
                "you cannot change your own role".to_owned(),
            ));
        }

        if self.user_repository.find_by_id(target).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{target}' not found")));
        }

        let updated = self.user_repository.update_role(target, role).await?;
        Ok(updated.identity())
    }
}
