//! In-process fakes for the application ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use taskpro_core::{AppError, AppResult, SessionToken};
use taskpro_domain::{
    EmailAddress, PermissionCatalog, Role, Task, TaskId, UserId, UserIdentity,
};

use crate::{
    AuthFailure, AuthorizationService, IssuedSessionToken, NewUserRecord, PasswordHasher,
    SessionService, SessionTokenCodec, TaskFilter, TaskRepository, TaskService, UserRecord,
    UserRepository, UserService,
};

const FAKE_TOKEN_PREFIX: &str = "fake-token.";

#[derive(Default)]
pub struct FakeUserRepository {
    users: RwLock<Vec<UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    async fn create(&self, user: NewUserRecord) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict("email already exists".to_owned()));
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
        users.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
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
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.display_name = display_name.to_owned();
        user.email = email.clone();
        Ok(user.clone())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn update_role(&self, user_id: UserId, role: Role) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.role = role;
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct FakeTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

#[async_trait]
impl TaskRepository for FakeTaskRepository {
    async fn insert(&self, task: &Task) -> AppResult<()> {
        self.tasks.write().await.push(task.clone());
        Ok(())
    }

    async fn find(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|task| task.id == task_id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut listed: Vec<Task> = tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        listed.sort_by(|left, right| filter.sort.compare(left, right));
        if let Some(limit) = filter.limit {
            listed.truncate(limit);
        }
        Ok(listed)
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .iter_mut()
            .find(|stored| stored.id == task.id)
            .ok_or_else(|| AppError::NotFound("task not found".to_owned()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> AppResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        Ok(tasks.len() != before)
    }
}

pub struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

pub struct FakeSessionTokenCodec;

impl FakeSessionTokenCodec {
    pub fn token_for(subject: UserId) -> String {
        format!("{FAKE_TOKEN_PREFIX}{subject}")
    }
}

impl SessionTokenCodec for FakeSessionTokenCodec {
    fn issue(&self, subject: UserId) -> AppResult<IssuedSessionToken> {
        Ok(IssuedSessionToken {
            token: SessionToken::new(Self::token_for(subject)),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    fn verify(&self, token: &str) -> Result<UserId, AuthFailure> {
        token
            .strip_prefix(FAKE_TOKEN_PREFIX)
            .and_then(|subject| subject.parse().ok())
            .ok_or(AuthFailure::InvalidToken)
    }
}

pub async fn seed_user(users: &FakeUserRepository, email: &str, role: Role) -> UserIdentity {
    let email = EmailAddress::new(email).unwrap_or_else(|_| panic!("seed email must be valid"));
    let display_name = email.as_str().split('@').next().unwrap_or("user").to_owned();
    users
        .create(NewUserRecord {
            display_name,
            email,
            role,
            password_hash: "hashed:correct horse battery".to_owned(),
        })
        .await
        .unwrap_or_else(|_| panic!("seed user must be created"))
        .identity()
}

pub struct Fixture {
    pub users: Arc<FakeUserRepository>,
    pub user_service: UserService,
    pub task_service: TaskService,
}

pub fn fixture() -> Fixture {
    let users = Arc::new(FakeUserRepository::default());
    let tasks = Arc::new(FakeTaskRepository::default());
    let authorization_service =
        AuthorizationService::new(Arc::new(PermissionCatalog::standard()));
    let session_service = SessionService::new(Arc::new(FakeSessionTokenCodec), users.clone());

    Fixture {
        user_service: UserService::new(
            users.clone(),
            Arc::new(FakePasswordHasher),
            session_service,
            authorization_service.clone(),
        ),
        task_service: TaskService::new(tasks, users.clone(), authorization_service),
        users,
    }
}
