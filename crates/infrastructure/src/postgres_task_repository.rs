//! PostgreSQL-backed task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskpro_application::{TaskFilter, TaskRepository};
use taskpro_core::{AppError, AppResult, NonEmptyString};
use taskpro_domain::{
    RecurringType, Task, TaskId, TaskPriority, TaskRecurrence, TaskStatus, UserId,
};

/// PostgreSQL implementation of the task repository port.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = "id, title, description, due_date, priority, status, assigned_to, \
     created_by, recurring_type, recurring_interval, recurring_days, recurring_day_of_month, \
     recurring_end_date, parent_task_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: uuid::Uuid,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    priority: String,
    status: String,
    assigned_to: uuid::Uuid,
    created_by: uuid::Uuid,
    recurring_type: Option<String>,
    recurring_interval: Option<i32>,
    recurring_days: Vec<i16>,
    recurring_day_of_month: Option<i16>,
    recurring_end_date: Option<DateTime<Utc>>,
    parent_task_id: Option<uuid::Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, error: AppError| {
            AppError::Internal(format!("task '{}' has invalid {field}: {error}", row.id))
        };

        let recurrence = match row.recurring_type.as_deref() {
            Some(value) => Some(TaskRecurrence {
                recurring_type: value
                    .parse::<RecurringType>()
                    .map_err(|error| corrupt("recurring type", error))?,
                interval: row
                    .recurring_interval
                    .map(|interval| u32::try_from(interval).unwrap_or(1)),
                days: row
                    .recurring_days
                    .iter()
                    .filter_map(|day| u8::try_from(*day).ok())
                    .collect(),
                day_of_month: row
                    .recurring_day_of_month
                    .and_then(|day| u8::try_from(day).ok()),
                end_date: row.recurring_end_date,
            }),
            None => None,
        };

        Ok(Self {
            id: TaskId::from_uuid(row.id),
            title: NonEmptyString::new(row.title.as_str())
                .map_err(|error| corrupt("title", error))?,
            description: NonEmptyString::new(row.description.as_str())
                .map_err(|error| corrupt("description", error))?,
            due_date: row.due_date,
            priority: row
                .priority
                .parse::<TaskPriority>()
                .map_err(|error| corrupt("priority", error))?,
            status: row
                .status
                .parse::<TaskStatus>()
                .map_err(|error| corrupt("status", error))?,
            assigned_to: UserId::from_uuid(row.assigned_to),
            created_by: UserId::from_uuid(row.created_by),
            recurrence,
            parent_task_id: row.parent_task_id.map(TaskId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

mod query;
mod write;

#[cfg(test)]
mod tests;

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> AppResult<()> {
        self.insert_impl(task).await
    }

    async fn find(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        self.find_impl(task_id).await
    }

    async fn list(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        self.list_impl(filter).await
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        self.update_impl(task).await
    }

    async fn delete(&self, task_id: TaskId) -> AppResult<bool> {
        self.delete_impl(task_id).await
    }
}

/// Flattened recurrence columns in bind order.
struct RecurrenceColumns {
    recurring_type: Option<&'static str>,
    interval: Option<i32>,
    days: Vec<i16>,
    day_of_month: Option<i16>,
    end_date: Option<DateTime<Utc>>,
}

impl RecurrenceColumns {
    fn from_task(task: &Task) -> AppResult<Self> {
        let Some(recurrence) = &task.recurrence else {
            return Ok(Self {
                recurring_type: None,
                interval: None,
                days: Vec::new(),
                day_of_month: None,
                end_date: None,
            });
        };

        let interval = recurrence
            .interval
            .map(i32::try_from)
            .transpose()
            .map_err(|error| {
                AppError::Validation(format!("recurring interval is out of range: {error}"))
            })?;

        Ok(Self {
            recurring_type: Some(recurrence.recurring_type.as_str()),
            interval,
            days: recurrence.days.iter().map(|day| i16::from(*day)).collect(),
            day_of_month: recurrence.day_of_month.map(i16::from),
            end_date: recurrence.end_date,
        })
    }
}
