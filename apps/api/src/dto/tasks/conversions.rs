use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use taskpro_application::{
    AssigneeWorkload, NewTaskInput, ReportSummary, TaskListQuery, TaskPatch, TaskSort,
};
use taskpro_core::{AppError, AppResult};
use taskpro_domain::{RecurringType, Task, TaskRecurrence, TaskStats, UserId};

use super::{
    AssigneeWorkloadResponse, CreateTaskRequest, ReportSummaryResponse, TaskListQueryParams,
    TaskPriorityCountsResponse, TaskRecurrenceBody, TaskResponse, TaskStatsResponse,
    TaskStatusCountsResponse, UpdateTaskRequest,
};

impl TryFrom<CreateTaskRequest> for NewTaskInput {
    type Error = AppError;

    fn try_from(value: CreateTaskRequest) -> AppResult<Self> {
        Ok(Self {
            title: value.title,
            description: value.description,
            due_date: parse_timestamp("due_date", &value.due_date)?,
            priority: parse_optional(value.priority.as_deref())?,
            status: parse_optional(value.status.as_deref())?,
            assigned_to: parse_optional(value.assigned_to.as_deref())?,
            recurrence: value.recurrence.map(TaskRecurrence::try_from).transpose()?,
            parent_task_id: parse_optional(value.parent_task_id.as_deref())?,
        })
    }
}

impl TryFrom<UpdateTaskRequest> for TaskPatch {
    type Error = AppError;

    fn try_from(value: UpdateTaskRequest) -> AppResult<Self> {
        Ok(Self {
            title: value.title,
            description: value.description,
            due_date: value
                .due_date
                .as_deref()
                .map(|due_date| parse_timestamp("due_date", due_date))
                .transpose()?,
            priority: parse_optional(value.priority.as_deref())?,
            status: parse_optional(value.status.as_deref())?,
            assigned_to: parse_optional(value.assigned_to.as_deref())?,
            recurrence: value.recurrence.map(TaskRecurrence::try_from).transpose()?,
        })
    }
}

impl TryFrom<TaskListQueryParams> for TaskListQuery {
    type Error = AppError;

    fn try_from(value: TaskListQueryParams) -> AppResult<Self> {
        let mut sort = TaskSort::default();
        if let Some(field) = non_blank(value.sort_by.as_deref()) {
            sort.field = field.parse()?;
        }
        if let Some(order) = non_blank(value.sort_order.as_deref()) {
            sort.order = order.parse()?;
        }

        let limit = non_blank(value.limit.as_deref())
            .map(|limit| {
                limit.parse::<usize>().map_err(|_| {
                    AppError::Validation(format!("limit must be a whole number, got '{limit}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            search: non_blank(value.search.as_deref()).map(ToOwned::to_owned),
            status: parse_optional(value.status.as_deref())?,
            priority: parse_optional(value.priority.as_deref())?,
            assigned_to: parse_optional::<UserId>(value.assigned_to.as_deref())?,
            sort,
            limit,
        })
    }
}

impl TryFrom<TaskRecurrenceBody> for TaskRecurrence {
    type Error = AppError;

    fn try_from(value: TaskRecurrenceBody) -> AppResult<Self> {
        let recurrence = Self {
            recurring_type: RecurringType::from_str(value.recurring_type.trim())?,
            interval: value.interval,
            days: value.days,
            day_of_month: value.day_of_month,
            end_date: value
                .end_date
                .as_deref()
                .map(|end_date| parse_timestamp("end_date", end_date))
                .transpose()?,
        };
        recurrence.validate()?;

        Ok(recurrence)
    }
}

impl From<TaskRecurrence> for TaskRecurrenceBody {
    fn from(value: TaskRecurrence) -> Self {
        Self {
            recurring_type: value.recurring_type.as_str().to_owned(),
            interval: value.interval,
            days: value.days,
            day_of_month: value.day_of_month,
            end_date: value.end_date.map(|end_date| end_date.to_rfc3339()),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title.into(),
            description: value.description.into(),
            due_date: value.due_date.to_rfc3339(),
            priority: value.priority.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            assigned_to: value.assigned_to.to_string(),
            created_by: value.created_by.to_string(),
            recurrence: value.recurrence.map(TaskRecurrenceBody::from),
            parent_task_id: value.parent_task_id.map(|task_id| task_id.to_string()),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<TaskStats> for TaskStatsResponse {
    fn from(value: TaskStats) -> Self {
        Self {
            total: value.total,
            status_counts: TaskStatusCountsResponse {
                todo: value.status_counts.todo,
                in_progress: value.status_counts.in_progress,
                completed: value.status_counts.completed,
            },
            priority_counts: TaskPriorityCountsResponse {
                low: value.priority_counts.low,
                medium: value.priority_counts.medium,
                high: value.priority_counts.high,
            },
            overdue: value.overdue,
            completion_rate: value.completion_rate,
        }
    }
}

impl From<AssigneeWorkload> for AssigneeWorkloadResponse {
    fn from(value: AssigneeWorkload) -> Self {
        Self {
            assignee: value.assignee.to_string(),
            total: value.total,
            completed: value.completed,
            overdue: value.overdue,
        }
    }
}

impl From<ReportSummary> for ReportSummaryResponse {
    fn from(value: ReportSummary) -> Self {
        Self {
            stats: value.stats.into(),
            per_assignee: value
                .per_assignee
                .into_iter()
                .map(AssigneeWorkloadResponse::from)
                .collect(),
        }
    }
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates, read as midnight UTC.
fn parse_timestamp(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::Validation(format!("{field} must be a date, got '{value}'")))
}

fn parse_optional<T>(value: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    non_blank(value).map(T::from_str).transpose()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
