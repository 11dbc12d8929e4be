use super::*;

impl PostgresTaskRepository {
    pub(super) async fn insert_impl(&self, task: &Task) -> AppResult<()> {
        let recurrence = RecurrenceColumns::from_task(task)?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, due_date, priority, status, assigned_to, created_by,
                recurring_type, recurring_interval, recurring_days, recurring_day_of_month,
                recurring_end_date, parent_task_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_str())
        .bind(task.due_date)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.assigned_to.as_uuid())
        .bind(task.created_by.as_uuid())
        .bind(recurrence.recurring_type)
        .bind(recurrence.interval)
        .bind(recurrence.days)
        .bind(recurrence.day_of_month)
        .bind(recurrence.end_date)
        .bind(task.parent_task_id.map(|parent| parent.as_uuid()))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert task: {error}")))?;

        Ok(())
    }

    pub(super) async fn update_impl(&self, task: &Task) -> AppResult<()> {
        let recurrence = RecurrenceColumns::from_task(task)?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                due_date = $4,
                priority = $5,
                status = $6,
                assigned_to = $7,
                recurring_type = $8,
                recurring_interval = $9,
                recurring_days = $10,
                recurring_day_of_month = $11,
                recurring_end_date = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_str())
        .bind(task.due_date)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.assigned_to.as_uuid())
        .bind(recurrence.recurring_type)
        .bind(recurrence.interval)
        .bind(recurrence.days)
        .bind(recurrence.day_of_month)
        .bind(recurrence.end_date)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update task: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("task '{}' not found", task.id)));
        }

        Ok(())
    }

    pub(super) async fn delete_impl(&self, task_id: TaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete task: {error}")))?;

        Ok(result.rows_affected() > 0)
    }
}
