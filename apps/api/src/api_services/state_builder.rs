use std::sync::Arc;

use sqlx::PgPool;
use taskpro_application::{
    AuthorizationService, PasswordHasher, SessionService, SessionTokenCodec, TaskRepository,
    TaskService, UserRepository, UserService,
};
use taskpro_core::AppError;
use taskpro_domain::PermissionCatalog;
use taskpro_infrastructure::{
    Argon2PasswordHasher, InMemoryTaskRepository, InMemoryUserRepository, JwtSessionTokenCodec,
    PostgresTaskRepository, PostgresUserRepository,
};
use tracing::warn;

use crate::api_config::ApiConfig;
use crate::state::{AppState, StorageBackend};

/// Repositories backing one running API.
pub struct RepositorySet {
    pub user_repository: Arc<dyn UserRepository>,
    pub task_repository: Arc<dyn TaskRepository>,
    pub backend: StorageBackend,
}

impl RepositorySet {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            task_repository: Arc::new(PostgresTaskRepository::new(pool.clone())),
            backend: StorageBackend::Postgres,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            user_repository: Arc::new(InMemoryUserRepository::new()),
            task_repository: Arc::new(InMemoryTaskRepository::new()),
            backend: StorageBackend::InMemory,
        }
    }
}

pub fn build_app_state(
    repositories: RepositorySet,
    config: &ApiConfig,
) -> Result<AppState, AppError> {
    let codec = JwtSessionTokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl)?;

    Ok(assemble(
        repositories,
        Arc::new(PermissionCatalog::standard()),
        Arc::new(codec),
        Arc::new(Argon2PasswordHasher::new()),
        config.token_ttl.num_minutes(),
    ))
}

pub(crate) fn assemble(
    repositories: RepositorySet,
    catalog: Arc<PermissionCatalog>,
    codec: Arc<dyn SessionTokenCodec>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_ttl_minutes: i64,
) -> AppState {
    for violation in catalog.hierarchy_violations() {
        warn!(
            senior = %violation.senior,
            junior = %violation.junior,
            permission = %violation.permission,
            "permission catalog breaks role hierarchy"
        );
    }

    let authorization_service = AuthorizationService::new(catalog);
    let session_service = SessionService::new(codec, repositories.user_repository.clone());

    AppState {
        user_service: UserService::new(
            repositories.user_repository.clone(),
            password_hasher,
            session_service.clone(),
            authorization_service.clone(),
        ),
        task_service: TaskService::new(
            repositories.task_repository,
            repositories.user_repository,
            authorization_service.clone(),
        ),
        session_service,
        authorization_service,
        storage_backend: repositories.backend,
        token_ttl_minutes,
    }
}
