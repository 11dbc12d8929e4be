//! Task use cases guarded by the permission catalog.
//!
//! The owner of a task is its assignee. Identities without the `*-all`
//! permissions only reach tasks they own, and in listings the tasks they
//! created.

use std::sync::Arc;

use serde::Serialize;
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{Permission, Task, TaskId, TaskStats, UserId, UserIdentity};

use crate::{AuthorizationService, TaskRepository, UserRepository};

mod commands;
mod queries;
mod reports;


/// Task totals for one assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssigneeWorkload {
    /// Assignee.
    pub assignee: UserId,
    /// Tasks assigned.
    pub total: u64,
    /// Completed tasks.
    pub completed: u64,
    /// Overdue tasks.
    pub overdue: u64,
}

/// Organisation-wide task report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Statistics over every task.
    pub stats: TaskStats,
    /// Per-assignee totals, busiest first.
    pub per_assignee: Vec<AssigneeWorkload>,
}

/// Application service for tasks.
#[derive(Clone)]
pub struct TaskService {
    task_repository: Arc<dyn TaskRepository>,
    user_repository: Arc<dyn UserRepository>,
    authorization_service: AuthorizationService,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(
        task_repository: Arc<dyn TaskRepository>,
        user_repository: Arc<dyn UserRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            task_repository,
            user_repository,
            authorization_service,
        }
    }

    async fn load(&self, task_id: TaskId) -> AppResult<Task> {
        self.task_repository
            .find(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task '{task_id}' not found")))
    }

    /// Assigning to anyone but oneself needs `tasks:assign` and an existing assignee.
    async fn require_assignable(&self, actor: &UserIdentity, assignee: UserId) -> AppResult<()> {
        if assignee == actor.id() {
            return Ok(());
        }

        self.authorization_service
            .require_permission(Some(actor), Permission::TasksAssign)?;

        if self.user_repository.find_by_id(assignee).await?.is_none() {
            return Err(AppError::Validation(format!(
                "assignee '{assignee}' does not exist"
            )));
        }

        Ok(())
    }

    /// Returns the involvement scope for actors without the given `*-all` permission.
    fn scope_for(&self, actor: &UserIdentity, unrestricted: Permission) -> Option<UserId> {
        if self
            .authorization_service
            .has_permission(Some(actor), unrestricted)
        {
            None
        } else {
            Some(actor.id())
        }
    }
}
