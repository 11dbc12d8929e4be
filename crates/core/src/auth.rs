use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Authorization scheme used for session tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Signed session credential as handed to clients.
///
/// The value is opaque outside the issuing service. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps an encoded token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for SessionToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("SessionToken(..)")
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Extracts the credential from an `Authorization` header value.
///
/// Returns `None` for anything other than `Bearer <non-empty token>`.
#[must_use]
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, credential) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty() && !credential.contains(' ')).then_some(credential)
}

/// Formats a session token as an `Authorization` header value.
#[must_use]
pub fn bearer_header_value(token: &SessionToken) -> String {
    format!("{BEARER_SCHEME} {}", token.as_str())
}

#[cfg(test)]
mod tests {
    use super::{SessionToken, bearer_header_value, parse_bearer};

    #[test]
    fn parses_bearer_credential() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer   "), None);
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer("abc.def.ghi"), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
    }

    #[test]
    fn header_value_round_trips_through_parser() {
        let token = SessionToken::new("abc.def.ghi");
        let header = bearer_header_value(&token);
        assert_eq!(parse_bearer(&header), Some(token.as_str()));
    }

    #[test]
    fn debug_output_hides_token() {
        let token = SessionToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
    }
}
