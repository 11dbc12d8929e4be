use taskpro_core::{AppError, AppResult};
use taskpro_domain::EmailAddress;

use crate::AuthenticatedSession;

use super::UserService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

impl UserService {
    /// Authenticates with email and password and opens a session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedSession> {
        let Ok(email) = EmailAddress::new(email) else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            // Unknown emails still pay for a hash.
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, &user.password_hash)?
        {
            return Err(invalid_credentials());
        }

        self.session_service.issue(user.identity())
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.to_owned())
}
