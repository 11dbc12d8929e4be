use taskpro_core::{AppError, AppResult};
use taskpro_domain::{EmailAddress, Role, validate_display_name, validate_password};

use crate::{AuthenticatedSession, NewUserRecord};

use super::{RegisterParams, UserService};

impl UserService {
    /// Registers a new account and opens a session for it.
    ///
    /// The first account in an empty store is the administrator. Every later
    /// account starts as a plain user.
    pub async fn register(&self, params: RegisterParams) -> AppResult<AuthenticatedSession> {
        let display_name = validate_display_name(&params.display_name)?;
        let email = EmailAddress::new(&params.email)?;
        validate_password(&params.password)?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            // Keep the cost of this path close to a successful registration.
            let _ = self.password_hasher.hash_password(&params.password);
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let role = if self.user_repository.count().await? == 0 {
            Role::Admin
        } else {
            Role::User
        };

        let password_hash = self.password_hasher.hash_password(&params.password)?;
        let record = self
            .user_repository
            .create(NewUserRecord {
                display_name: display_name.into(),
                email,
                role,
                password_hash,
            })
            .await?;

        self.session_service.issue(record.identity())
    }
}
