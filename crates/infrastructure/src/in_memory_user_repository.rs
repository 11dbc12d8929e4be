use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use taskpro_application::{NewUserRecord, UserRecord, UserRepository};
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{EmailAddress, Role, UserId};
use tokio::sync::RwLock;

/// In-memory user repository for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(
    users: &HashMap<UserId, UserRecord>,
    email: &EmailAddress,
    except: Option<UserId>,
) -> bool {
    users
        .values()
        .any(|user| &user.email == email && Some(user.id) != except)
}

fn not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user '{user_id}' not found"))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            display_name: user.display_name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        let users = self.users.read().await;
        let mut values: Vec<UserRecord> = users.values().cloned().collect();
        values.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });

        Ok(values)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        display_name: &str,
        email: &EmailAddress,
    ) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if email_taken(&users, email, Some(user_id)) {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let user = users.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;
        user.display_name = display_name.to_owned();
        user.email = email.clone();
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;
        user.password_hash = password_hash.to_owned();
        user.updated_at = Utc::now();

        Ok(())
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;
        user.role = role;
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}
