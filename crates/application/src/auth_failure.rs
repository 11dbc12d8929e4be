use taskpro_core::AppError;
use thiserror::Error;

/// Reasons the request gate rejects a request.
///
/// Messages are shown to clients verbatim. `PermissionDenied` never names the
/// permission that was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No bearer credential was presented.
    #[error("Authentication token required")]
    MissingToken,

    /// Signature, format or expiry check failed.
    #[error("Invalid token")]
    InvalidToken,

    /// The token is valid but its subject no longer exists.
    #[error("User not found")]
    UnknownIdentity,

    /// An authorization guard ran without an authenticated identity.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Authenticated but the role does not grant the action.
    #[error("You do not have permission to perform this action")]
    PermissionDenied,
}

impl From<AuthFailure> for AppError {
    fn from(value: AuthFailure) -> Self {
        match value {
            AuthFailure::MissingToken
            | AuthFailure::UnknownIdentity
            | AuthFailure::AuthenticationRequired => Self::Unauthorized(value.to_string()),
            AuthFailure::InvalidToken | AuthFailure::PermissionDenied => {
                Self::Forbidden(value.to_string())
            }
        }
    }
}
