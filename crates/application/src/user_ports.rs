use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskpro_core::AppResult;
use taskpro_domain::{EmailAddress, Role, UserId, UserIdentity};

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Canonical email address.
    pub email: EmailAddress,
    /// Role currently held.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Returns the identity snapshot carried through requests.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.id,
            self.display_name.clone(),
            self.email.clone(),
            self.role,
        )
    }
}

/// Values for a user row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Display name.
    pub display_name: String,
    /// Canonical email address.
    pub email: EmailAddress,
    /// Initial role.
    pub role: Role,
    /// Argon2id password hash.
    pub password_hash: String,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by canonical email.
    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>>;

    /// Creates a new user. Duplicate emails are `Conflict`.
    async fn create(&self, user: NewUserRecord) -> AppResult<UserRecord>;

    /// Lists users ordered by creation time.
    async fn list(&self) -> AppResult<Vec<UserRecord>>;

    /// Returns the number of stored users.
    async fn count(&self) -> AppResult<u64>;

    /// Updates display name and email. Duplicate emails are `Conflict`.
    async fn update_profile(
        &self,
        user_id: UserId,
        display_name: &str,
        email: &EmailAddress,
    ) -> AppResult<UserRecord>;

    /// Replaces the password hash.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Replaces the role.
    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<UserRecord>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
