use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Recurrence rule as sent and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-recurrence.ts"
)]
pub struct TaskRecurrenceBody {
    pub recurring_type: String,
    pub interval: Option<u32>,
    #[serde(default)]
    pub days: Vec<u8>,
    pub day_of_month: Option<u8>,
    pub end_date: Option<String>,
}

/// API representation of a task.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: String,
    pub created_by: String,
    pub recurrence: Option<TaskRecurrenceBody>,
    pub parent_task_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload for task creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-task-request.ts"
)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: String,
    #[serde(default)]
    #[ts(optional)]
    pub priority: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub recurrence: Option<TaskRecurrenceBody>,
    #[serde(default)]
    #[ts(optional)]
    pub parent_task_id: Option<String>,
}

/// Incoming payload for a partial task update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-task-request.ts"
)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    #[ts(optional)]
    pub title: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub due_date: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub priority: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub recurrence: Option<TaskRecurrenceBody>,
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQueryParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
}

/// Task counts per status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-status-counts.ts"
)]
pub struct TaskStatusCountsResponse {
    pub todo: u64,
    #[serde(rename = "in-progress")]
    pub in_progress: u64,
    pub completed: u64,
}

/// Task counts per priority.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-priority-counts.ts"
)]
pub struct TaskPriorityCountsResponse {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Dashboard statistics.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-stats-response.ts"
)]
pub struct TaskStatsResponse {
    pub total: u64,
    pub status_counts: TaskStatusCountsResponse,
    pub priority_counts: TaskPriorityCountsResponse,
    pub overdue: u64,
    pub completion_rate: u8,
}

/// Task totals for one assignee.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assignee-workload-response.ts"
)]
pub struct AssigneeWorkloadResponse {
    pub assignee: String,
    pub total: u64,
    pub completed: u64,
    pub overdue: u64,
}

/// Organisation-wide task report.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/report-summary-response.ts"
)]
pub struct ReportSummaryResponse {
    pub stats: TaskStatsResponse,
    pub per_assignee: Vec<AssigneeWorkloadResponse>,
}
