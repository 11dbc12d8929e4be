//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskpro_application::{NewUserRecord, UserRecord, UserRepository};
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{EmailAddress, Role, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    display_name: String,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|_| {
            AppError::Internal(format!("user '{}' has unknown role '{}'", row.id, row.role))
        })?;
        let email = EmailAddress::new(row.email).map_err(|error| {
            AppError::Internal(format!("user '{}' has invalid stored email: {error}", row.id))
        })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            display_name: row.display_name,
            email,
            role,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, display_name, email, role, password_hash, created_at, updated_at";

mod account;
mod lookup;


#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserRecord> {
        self.create_impl(user).await
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        self.list_impl().await
    }

    async fn count(&self) -> AppResult<u64> {
        self.count_impl().await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        display_name: &str,
        email: &EmailAddress,
    ) -> AppResult<UserRecord> {
        self.update_profile_impl(user_id, display_name, email).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        self.update_password_impl(user_id, password_hash).await
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<UserRecord> {
        self.update_role_impl(user_id, role).await
    }
}

fn email_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user '{user_id}' not found"))
}
