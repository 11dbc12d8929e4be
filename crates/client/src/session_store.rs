use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use taskpro_core::SessionToken;
use taskpro_domain::UserIdentity;
use tracing::warn;

use crate::{ClientResult, SessionStorage};

/// Storage key of the persisted session record.
pub const SESSION_STORAGE_KEY: &str = "auth-storage";

/// Persisted shape of the client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Bearer token, if logged in.
    pub token: Option<SessionToken>,
    /// Identity the token was issued for.
    pub user: Option<UserIdentity>,
    /// Whether a token is present.
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Holds the current token and identity, mirrored into [`SessionStorage`].
///
/// Last write wins. Reads never touch storage after [`SessionStore::load`].
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    record: RwLock<SessionRecord>,
}

impl SessionStore {
    /// Restores the session persisted in `storage`.
    ///
    /// A record is adopted only when it parses and carries a token. Anything
    /// else starts an empty session.
    #[must_use]
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let record = match storage.get(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionRecord>(&raw) {
                Ok(record) if record.token.is_some() => SessionRecord {
                    is_authenticated: true,
                    ..record
                },
                Ok(_) => SessionRecord::default(),
                Err(error) => {
                    warn!(error = %error, "ignoring unreadable persisted session");
                    SessionRecord::default()
                }
            },
            Ok(None) => SessionRecord::default(),
            Err(error) => {
                warn!(error = %error, "session storage unavailable, starting signed out");
                SessionRecord::default()
            }
        };

        Self {
            storage,
            record: RwLock::new(record),
        }
    }

    /// Persists the session, then makes it current. A failed write leaves the
    /// previous session in place.
    pub fn set_session(&self, token: SessionToken, identity: UserIdentity) -> ClientResult<()> {
        let record = SessionRecord {
            token: Some(token),
            user: Some(identity),
            is_authenticated: true,
        };
        let encoded = serde_json::to_string(&record)?;
        self.storage.set(SESSION_STORAGE_KEY, &encoded)?;

        *self.record.write().unwrap_or_else(PoisonError::into_inner) = record;
        Ok(())
    }

    /// Forgets the session and removes its persisted copy.
    pub fn clear_session(&self) -> ClientResult<()> {
        *self.record.write().unwrap_or_else(PoisonError::into_inner) = SessionRecord::default();
        self.storage.remove(SESSION_STORAGE_KEY)
    }

    /// Returns the current bearer token.
    #[must_use]
    pub fn current_token(&self) -> Option<SessionToken> {
        self.snapshot().token
    }

    /// Returns the identity of the current session.
    #[must_use]
    pub fn current_identity(&self) -> Option<UserIdentity> {
        self.snapshot().user
    }

    /// Returns whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }

    /// Returns a copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> SessionRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskpro_core::SessionToken;
    use taskpro_domain::{EmailAddress, Role, UserId, UserIdentity};

    use super::{SESSION_STORAGE_KEY, SessionStore};
    use crate::{ClientError, ClientResult, MemorySessionStorage, SessionStorage};

    struct ReadOnlyStorage;

    impl SessionStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> ClientResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> ClientResult<()> {
            Err(ClientError::Storage("storage is read-only".to_owned()))
        }

        fn remove(&self, _key: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    fn identity() -> UserIdentity {
        UserIdentity::new(
            UserId::new(),
            "Ada",
            EmailAddress::new("ada@example.com").unwrap_or_else(|_| panic!("email")),
            Role::Manager,
        )
    }

    #[test]
    fn set_session_persists_under_storage_key() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::load(storage.clone());
        let user = identity();

        assert!(
            store
                .set_session(SessionToken::new("abc"), user.clone())
                .is_ok()
        );

        assert!(store.is_authenticated());
        assert_eq!(store.current_identity(), Some(user));
        let raw = storage
            .get(SESSION_STORAGE_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        assert!(raw.contains("\"isAuthenticated\":true"));
        assert!(raw.contains("\"token\":\"abc\""));
    }

    #[test]
    fn failed_write_keeps_previous_session() {
        let store = SessionStore::load(Arc::new(ReadOnlyStorage));

        let result = store.set_session(SessionToken::new("abc"), identity());

        assert!(matches!(result, Err(ClientError::Storage(_))));
        assert!(!store.is_authenticated());
        assert_eq!(store.current_identity(), None);
    }

    #[test]
    fn persisted_session_is_restored() {
        let storage = Arc::new(MemorySessionStorage::new());
        let user = identity();
        let first = SessionStore::load(storage.clone());
        assert!(
            first
                .set_session(SessionToken::new("persisted"), user.clone())
                .is_ok()
        );

        let restored = SessionStore::load(storage);
        assert_eq!(
            restored.current_token().as_ref().map(SessionToken::as_str),
            Some("persisted")
        );
        assert_eq!(restored.current_identity(), Some(user));
    }

    #[test]
    fn record_without_token_is_not_adopted() {
        let storage = Arc::new(MemorySessionStorage::new());
        assert!(
            storage
                .set(
                    SESSION_STORAGE_KEY,
                    r#"{"token":null,"user":null,"isAuthenticated":true}"#
                )
                .is_ok()
        );

        let store = SessionStore::load(storage);
        assert!(!store.is_authenticated());
        assert_eq!(store.current_identity(), None);
    }

    #[test]
    fn corrupt_record_starts_empty() {
        let storage = Arc::new(MemorySessionStorage::new());
        assert!(storage.set(SESSION_STORAGE_KEY, "{not json").is_ok());

        let store = SessionStore::load(storage);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clear_session_removes_persisted_copy() {
        let storage = Arc::new(MemorySessionStorage::new());
        let store = SessionStore::load(storage.clone());
        assert!(store.set_session(SessionToken::new("abc"), identity()).is_ok());

        assert!(store.clear_session().is_ok());

        assert!(!store.is_authenticated());
        assert_eq!(store.current_token(), None);
        assert_eq!(storage.get(SESSION_STORAGE_KEY).ok(), Some(None));
    }
}
