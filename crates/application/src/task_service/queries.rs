use chrono::Utc;
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{Permission, Task, TaskId, TaskStats, UserIdentity};

use crate::{MAX_TASK_LIST_LIMIT, TaskFilter, TaskListQuery};

use super::TaskService;

impl TaskService {
    /// Lists tasks visible to the actor. Requires `tasks:read`.
    pub async fn list(&self, actor: &UserIdentity, query: TaskListQuery) -> AppResult<Vec<Task>> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksRead)?;

        if let Some(limit) = query.limit
            && !(1..=MAX_TASK_LIST_LIMIT).contains(&limit)
        {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_TASK_LIST_LIMIT}"
            )));
        }

        let filter = TaskFilter {
            involving: self.scope_for(actor, Permission::TasksReadAll),
            search: query
                .search
                .map(|term| term.trim().to_owned())
                .filter(|term| !term.is_empty()),
            status: query.status,
            priority: query.priority,
            assigned_to: query.assigned_to,
            sort: query.sort,
            limit: query.limit,
        };

        self.task_repository.list(&filter).await
    }

    /// Returns one task. Requires `tasks:read` and ownership or `tasks:read-all`.
    pub async fn get(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<Task> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksRead)?;

        let task = self.load(task_id).await?;
        self.authorization_service.require_owner_or_permission(
            Some(actor),
            Some(task.owner()),
            Permission::TasksReadAll,
        )?;

        Ok(task)
    }

    /// Dashboard statistics over the tasks the actor can list.
    pub async fn stats(&self, actor: &UserIdentity) -> AppResult<TaskStats> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksRead)?;

        let filter = TaskFilter {
            involving: self.scope_for(actor, Permission::TasksReadAll),
            ..TaskFilter::default()
        };
        let tasks = self.task_repository.list(&filter).await?;

        Ok(TaskStats::from_tasks(&tasks, Utc::now()))
    }
}
