//! Session token port and the authentication half of the request gate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskpro_core::{AppResult, SessionToken, parse_bearer};
use taskpro_domain::{UserId, UserIdentity};

use crate::{AuthFailure, UserRepository};

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedSessionToken {
    /// Encoded token.
    pub token: SessionToken,
    /// Expiry of the token.
    pub expires_at: DateTime<Utc>,
}

/// Port for signing and verifying stateless session tokens.
pub trait SessionTokenCodec: Send + Sync {
    /// Issues a token for the subject, valid from now.
    fn issue(&self, subject: UserId) -> AppResult<IssuedSessionToken>;

    /// Verifies signature, format and expiry and returns the subject.
    ///
    /// All failures collapse into [`AuthFailure::InvalidToken`].
    fn verify(&self, token: &str) -> Result<UserId, AuthFailure>;
}

/// Identity together with the token that proves it.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// Token to present as a bearer credential.
    pub token: SessionToken,
    /// Expiry of the token.
    pub expires_at: DateTime<Utc>,
    /// Identity bound to the token.
    pub identity: UserIdentity,
}

/// Issues session tokens and resolves bearer credentials to identities.
#[derive(Clone)]
pub struct SessionService {
    codec: Arc<dyn SessionTokenCodec>,
    user_repository: Arc<dyn UserRepository>,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        codec: Arc<dyn SessionTokenCodec>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            codec,
            user_repository,
        }
    }

    /// Issues a session for an identity.
    pub fn issue(&self, identity: UserIdentity) -> AppResult<AuthenticatedSession> {
        let issued = self.codec.issue(identity.id())?;

        Ok(AuthenticatedSession {
            token: issued.token,
            expires_at: issued.expires_at,
            identity,
        })
    }

    /// Resolves the `Authorization` header value of a request to an identity.
    ///
    /// Missing or malformed header is `MissingToken`, a token that fails
    /// verification is `InvalidToken`, and a valid token whose subject is gone
    /// is `UnknownIdentity`. Repository failures propagate unchanged.
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<UserIdentity> {
        let token = authorization
            .and_then(parse_bearer)
            .ok_or(AuthFailure::MissingToken)?;

        let subject = self.codec.verify(token)?;

        let record = self
            .user_repository
            .find_by_id(subject)
            .await?
            .ok_or(AuthFailure::UnknownIdentity)?;

        Ok(record.identity())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskpro_core::AppError;
    use taskpro_domain::{Role, UserId};

    use crate::test_support::{FakeSessionTokenCodec, FakeUserRepository, seed_user};

    use super::SessionService;

    #[tokio::test]
    async fn authenticate_resolves_issued_token() {
        let users = Arc::new(FakeUserRepository::default());
        let identity = seed_user(&users, "ada@example.com", Role::Manager).await;
        let service = SessionService::new(Arc::new(FakeSessionTokenCodec), users);

        let session = service.issue(identity.clone());
        assert!(session.is_ok());
        let header = format!(
            "Bearer {}",
            session.unwrap_or_else(|_| panic!("issue")).token.as_str()
        );

        let resolved = service.authenticate(Some(&header)).await;
        assert_eq!(resolved.ok(), Some(identity));
    }

    #[tokio::test]
    async fn missing_header_is_missing_token() {
        let service = SessionService::new(
            Arc::new(FakeSessionTokenCodec),
            Arc::new(FakeUserRepository::default()),
        );

        let result = service.authenticate(None).await;
        assert!(
            matches!(result, Err(AppError::Unauthorized(ref message)) if message == "Authentication token required")
        );

        let malformed = service.authenticate(Some("Token abc")).await;
        assert!(matches!(malformed, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_token() {
        let service = SessionService::new(
            Arc::new(FakeSessionTokenCodec),
            Arc::new(FakeUserRepository::default()),
        );

        let result = service.authenticate(Some("Bearer garbage")).await;
        assert!(
            matches!(result, Err(AppError::Forbidden(ref message)) if message == "Invalid token")
        );
    }

    #[tokio::test]
    async fn deleted_subject_is_unknown_identity() {
        let service = SessionService::new(
            Arc::new(FakeSessionTokenCodec),
            Arc::new(FakeUserRepository::default()),
        );
        let header = format!("Bearer {}", FakeSessionTokenCodec::token_for(UserId::new()));

        let result = service.authenticate(Some(&header)).await;
        assert!(
            matches!(result, Err(AppError::Unauthorized(ref message)) if message == "User not found")
        );
    }
}
