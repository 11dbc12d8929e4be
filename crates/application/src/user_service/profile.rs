use taskpro_core::{AppError, AppResult};
use taskpro_domain::{EmailAddress, UserIdentity, validate_display_name, validate_password};

use crate::UserRecord;

use super::{UpdateProfileInput, UserService};

impl UserService {
    /// Returns the stored profile of the actor.
    pub async fn profile(&self, actor: &UserIdentity) -> AppResult<UserIdentity> {
        Ok(self.load(actor).await?.identity())
    }

    /// Updates display name and email of the actor.
    pub async fn update_profile(
        &self,
        actor: &UserIdentity,
        input: UpdateProfileInput,
    ) -> AppResult<UserIdentity> {
        let current = self.load(actor).await?;

        let display_name = match input.display_name.as_deref() {
            Some(value) => String::from(validate_display_name(value)?),
            None => current.display_name.clone(),
        };

        let email = match input.email.as_deref() {
            Some(value) => EmailAddress::new(value)?,
            None => current.email.clone(),
        };

        if email != current.email
            && let Some(existing) = self.user_repository.find_by_email(&email).await?
            && existing.id != current.id
        {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let updated = self
            .user_repository
            .update_profile(current.id, &display_name, &email)
            .await?;

        Ok(updated.identity())
    }

    /// Changes the actor's password after checking the current one.
    pub async fn change_password(
        &self,
        actor: &UserIdentity,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.load(actor).await?;

        if !self
            .password_hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::Unauthorized(
                "current password is incorrect".to_owned(),
            ));
        }

        validate_password(new_password)?;

        let new_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user.id, &new_hash)
            .await
    }

    async fn load(&self, actor: &UserIdentity) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(actor.id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", actor.id())))
    }
}
