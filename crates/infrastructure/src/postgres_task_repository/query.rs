use sqlx::{Postgres, QueryBuilder};
use taskpro_application::{SortOrder, TaskSortField};

use super::*;

impl PostgresTaskRepository {
    pub(super) async fn find_impl(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 LIMIT 1"
        ))
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task: {error}")))?;

        row.map(Task::try_from).transpose()
    }

    pub(super) async fn list_impl(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE TRUE"));

        if let Some(user_id) = filter.involving {
            builder.push(" AND (assigned_to = ");
            builder.push_bind(user_id.as_uuid());
            builder.push(" OR created_by = ");
            builder.push_bind(user_id.as_uuid());
            builder.push(')');
        }

        if let Some(term) = filter.search.as_deref().filter(|term| !term.is_empty()) {
            let pattern = format!("%{}%", escape_like(term));
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(')');
        }

        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }

        if let Some(priority) = filter.priority {
            builder.push(" AND priority = ");
            builder.push_bind(priority.as_str());
        }

        if let Some(assignee) = filter.assigned_to {
            builder.push(" AND assigned_to = ");
            builder.push_bind(assignee.as_uuid());
        }

        let direction = match filter.sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let column = match filter.sort.field {
            TaskSortField::CreatedAt => "created_at",
            TaskSortField::DueDate => "due_date",
            TaskSortField::Priority => {
                "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END"
            }
            TaskSortField::Title => "LOWER(title)",
        };
        builder.push(format!(" ORDER BY {column} {direction}, id {direction}"));

        if let Some(limit) = filter.limit {
            let limit = i64::try_from(limit).map_err(|error| {
                AppError::Validation(format!("invalid task list limit: {error}"))
            })?;
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }

        let rows = builder
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list tasks: {error}")))?;

        rows.into_iter().map(Task::try_from).collect()
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
