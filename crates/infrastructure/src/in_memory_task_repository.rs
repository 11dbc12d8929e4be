use std::collections::HashMap;

use async_trait::async_trait;
use taskpro_application::{TaskFilter, TaskRepository};
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{Task, TaskId};
use tokio::sync::RwLock;

/// In-memory task repository for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Conflict(format!(
                "task '{}' already exists",
                task.id
            )));
        }

        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&task_id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut values: Vec<Task> = tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();

        values.sort_by(|left, right| filter.sort.compare(left, right));
        if let Some(limit) = filter.limit {
            values.truncate(limit);
        }

        Ok(values)
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .get_mut(&task.id)
            .ok_or_else(|| AppError::NotFound(format!("task '{}' not found", task.id)))?;
        *stored = task.clone();

        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> AppResult<bool> {
        Ok(self.tasks.write().await.remove(&task_id).is_some())
    }
}
