use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskpro_core::SessionToken;
use taskpro_domain::{
    TaskId, TaskPriority, TaskRecurrence, TaskStatus, UserId, UserIdentity,
};

/// Identity as returned by the API.
pub type UserResponse = UserIdentity;

/// Body of successful login and registration responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: SessionToken,
    /// Expiry of the token.
    pub expires_at: DateTime<Utc>,
    /// Identity the token was issued for.
    pub user: UserResponse,
}

/// Task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskResponse {
    /// Task id.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Workflow state.
    pub status: TaskStatus,
    /// Assignee.
    pub assigned_to: UserId,
    /// Creator.
    pub created_by: UserId,
    /// Recurrence rule.
    #[serde(default)]
    pub recurrence: Option<TaskRecurrence>,
    /// Originating task.
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Body of a task creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Urgency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// Workflow state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Assignee, the caller when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    /// Recurrence rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<TaskRecurrence>,
    /// Originating task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<TaskId>,
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListParams {
    /// Case-insensitive search term.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<TaskStatus>,
    /// Exact priority.
    pub priority: Option<TaskPriority>,
    /// Exact assignee.
    pub assigned_to: Option<UserId>,
    /// `created_at`, `due_date`, `priority` or `title`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    pub sort_order: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
}

impl TaskListParams {
    /// Returns the parameters as query pairs, skipping unset ones.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_owned()));
        }
        if let Some(assignee) = self.assigned_to {
            pairs.push(("assigned_to", assignee.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by", sort_by.clone()));
        }
        if let Some(sort_order) = &self.sort_order {
            pairs.push(("sort_order", sort_order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleBody {
    pub role: taskpro_domain::Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
