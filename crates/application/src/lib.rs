//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_failure;
mod authorization_service;
mod session_service;
mod task_ports;
mod task_service;
mod user_ports;
mod user_service;

#[cfg(test)]
mod test_support;

pub use auth_failure::AuthFailure;
pub use authorization_service::AuthorizationService;
pub use session_service::{
    AuthenticatedSession, IssuedSessionToken, SessionService, SessionTokenCodec,
};
pub use task_ports::{
    MAX_TASK_LIST_LIMIT, NewTaskInput, SortOrder, TaskFilter, TaskListQuery, TaskPatch, TaskRepository, TaskSort,
    TaskSortField,
};
pub use task_service::{AssigneeWorkload, ReportSummary, TaskService};
pub use user_ports::{NewUserRecord, PasswordHasher, UserRecord, UserRepository};
pub use user_service::{RegisterParams, UpdateProfileInput, UserService};
