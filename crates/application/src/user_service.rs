//! Account lifecycle: registration, login, profile and role administration.
//!
//! Login failures are reported with one generic message so that callers
//! cannot probe which emails are registered.

use std::sync::Arc;

use crate::{AuthorizationService, PasswordHasher, SessionService, UserRepository};

mod login;
mod profile;
mod registration;
mod roles;

#[cfg(test)]
mod tests;

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Display name for the new account.
    pub display_name: String,
    /// Email address for the new account.
    pub email: String,
    /// Plaintext password, checked against the password policy.
    pub password: String,
}

/// Partial profile update. Absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New display name.
    pub display_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
}

/// Application service for user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    session_service: SessionService,
    authorization_service: AuthorizationService,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_service: SessionService,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            session_service,
            authorization_service,
        }
    }
}
