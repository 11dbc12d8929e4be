//! HS256 JSON Web Token implementation of the session token port.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use taskpro_application::{AuthFailure, IssuedSessionToken, SessionTokenCodec};
use taskpro_core::{AppError, AppResult, SessionToken};
use taskpro_domain::UserId;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Stateless session tokens signed with a shared secret.
///
/// Expiry is checked against the wall clock with zero leeway.
#[derive(Clone)]
pub struct JwtSessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtSessionTokenCodec {
    /// Creates a codec for the secret and validity window.
    pub fn new(secret: &[u8], ttl: Duration) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Validation(
                "token signing secret must not be empty".to_owned(),
            ));
        }

        if ttl <= Duration::zero() {
            return Err(AppError::Validation(
                "token validity window must be positive".to_owned(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Returns the validity window of issued tokens.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token as if it had been signed at `issued_at`.
    pub fn issue_at(
        &self,
        subject: UserId,
        issued_at: DateTime<Utc>,
    ) -> AppResult<IssuedSessionToken> {
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::Internal(format!(
                "session token expiry overflows with a validity window of {} minutes",
                self.ttl.num_minutes()
            ))
        })?;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign session token: {error}")))?;

        Ok(IssuedSessionToken {
            token: SessionToken::new(token),
            expires_at,
        })
    }
}

impl SessionTokenCodec for JwtSessionTokenCodec {
    fn issue(&self, subject: UserId) -> AppResult<IssuedSessionToken> {
        self.issue_at(subject, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<UserId, AuthFailure> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| {
                debug!(reason = ?error.kind(), "session token rejected");
                AuthFailure::InvalidToken
            })?;

        data.claims.sub.parse::<UserId>().map_err(|_| {
            debug!("session token subject is not an identity id");
            AuthFailure::InvalidToken
        })
    }
}
