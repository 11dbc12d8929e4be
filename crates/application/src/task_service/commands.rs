use chrono::Utc;
use taskpro_core::{AppError, AppResult, NonEmptyString};
use taskpro_domain::{Permission, Task, TaskId, UserIdentity};

use crate::{NewTaskInput, TaskPatch};

use super::TaskService;

impl TaskService {
    /// Creates a task. Requires `tasks:create`.
    pub async fn create(&self, actor: &UserIdentity, input: NewTaskInput) -> AppResult<Task> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksCreate)?;

        let assignee = input.assigned_to.unwrap_or(actor.id());
        self.require_assignable(actor, assignee).await?;

        if let Some(recurrence) = &input.recurrence {
            recurrence.validate()?;
        }

        if let Some(parent_id) = input.parent_task_id
            && self.task_repository.find(parent_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "parent task '{parent_id}' does not exist"
            )));
        }

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title: NonEmptyString::new(input.title)?,
            description: NonEmptyString::new(input.description)?,
            due_date: input.due_date,
            priority: input.priority.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            assigned_to: assignee,
            created_by: actor.id(),
            recurrence: input.recurrence,
            parent_task_id: input.parent_task_id,
            created_at: now,
            updated_at: now,
        };

        self.task_repository.insert(&task).await?;
        Ok(task)
    }

    /// Applies a partial update. Requires `tasks:update` and ownership or
    /// `tasks:update-all`.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> AppResult<Task> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksUpdate)?;

        let mut task = self.load(task_id).await?;
        self.authorization_service.require_owner_or_permission(
            Some(actor),
            Some(task.owner()),
            Permission::TasksUpdateAll,
        )?;

        if let Some(assignee) = patch.assigned_to
            && assignee != task.assigned_to
        {
            self.require_assignable(actor, assignee).await?;
            task.assigned_to = assignee;
        }

        if let Some(title) = patch.title {
            task.title = NonEmptyString::new(title)?;
        }
        if let Some(description) = patch.description {
            task.description = NonEmptyString::new(description)?;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(recurrence) = patch.recurrence {
            recurrence.validate()?;
            task.recurrence = Some(recurrence);
        }

        task.updated_at = Utc::now();
        self.task_repository.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task. Requires `tasks:delete` and ownership or `tasks:delete-all`.
    pub async fn delete(&self, actor: &UserIdentity, task_id: TaskId) -> AppResult<()> {
        self.authorization_service
            .require_permission(Some(actor), Permission::TasksDelete)?;

        let task = self.load(task_id).await?;
        self.authorization_service.require_owner_or_permission(
            Some(actor),
            Some(task.owner()),
            Permission::TasksDeleteAll,
        )?;

        if !self.task_repository.delete(task.id).await? {
            return Err(AppError::NotFound(format!("task '{task_id}' not found")));
        }

        Ok(())
    }
}
