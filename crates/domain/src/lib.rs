//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod security;
mod task;
mod user;

pub use catalog::{HierarchyViolation, PermissionCatalog, PermissionEvaluator};
pub use security::{Permission, Role};
pub use task::{
    RecurringType, Task, TaskId, TaskPriority, TaskPriorityCounts, TaskRecurrence, TaskStats,
    TaskStatus, TaskStatusCounts,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId, UserIdentity,
    validate_display_name, validate_password,
};
