use std::sync::Arc;

use taskpro_application::{AuthorizationService, SessionService, TaskService, UserService};
use taskpro_domain::PermissionCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub task_service: TaskService,
    pub session_service: SessionService,
    pub authorization_service: AuthorizationService,
    pub storage_backend: StorageBackend,
    pub token_ttl_minutes: i64,
}

impl AppState {
    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        self.authorization_service.catalog()
    }
}

/// Where repositories keep their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    InMemory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::InMemory => "in-memory",
        }
    }
}
