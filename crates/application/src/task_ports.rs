use std::cmp::Ordering;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskpro_core::{AppError, AppResult};
use taskpro_domain::{Task, TaskId, TaskPriority, TaskRecurrence, TaskStatus, UserId};

/// Largest page a task listing may return.
pub const MAX_TASK_LIST_LIMIT: usize = 100;

/// Column a task listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Deadline.
    DueDate,
    /// Priority rank.
    Priority,
    /// Title, case-insensitive.
    Title,
}

impl TaskSortField {
    /// Returns the transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }
}

impl FromStr for TaskSortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "due_date" | "dueDate" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            _ => Err(AppError::Validation(format!(
                "unknown sort field '{value}'"
            ))),
        }
    }
}

/// Direction of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort order '{value}'"
            ))),
        }
    }
}

/// Ordering applied to a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSort {
    /// Column.
    pub field: TaskSortField,
    /// Direction.
    pub order: SortOrder,
}

impl TaskSort {
    /// Compares two tasks under this ordering. Ties fall back to the id.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let ordering = match self.field {
            TaskSortField::CreatedAt => left.created_at.cmp(&right.created_at),
            TaskSortField::DueDate => left.due_date.cmp(&right.due_date),
            TaskSortField::Priority => left.priority.rank().cmp(&right.priority.rank()),
            TaskSortField::Title => left
                .title
                .as_str()
                .to_lowercase()
                .cmp(&right.title.as_str().to_lowercase()),
        }
        .then_with(|| left.id.cmp(&right.id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Caller-supplied listing options, before access scoping.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<TaskStatus>,
    /// Exact priority.
    pub priority: Option<TaskPriority>,
    /// Exact assignee.
    pub assigned_to: Option<UserId>,
    /// Ordering.
    pub sort: TaskSort,
    /// Page size, 1 through 100.
    pub limit: Option<usize>,
}

/// Repository-level filter, including the access scope.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restricts results to tasks assigned to or created by this identity.
    pub involving: Option<UserId>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<TaskStatus>,
    /// Exact priority.
    pub priority: Option<TaskPriority>,
    /// Exact assignee.
    pub assigned_to: Option<UserId>,
    /// Ordering.
    pub sort: TaskSort,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// Returns whether the task passes every predicate of the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(user_id) = self.involving
            && !task.involves(user_id)
        {
            return false;
        }

        if let Some(term) = self.search.as_deref()
            && !term.is_empty()
            && !task.matches_search(term)
        {
            return false;
        }

        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
            && self
                .assigned_to
                .is_none_or(|assignee| task.assigned_to == assignee)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTaskInput {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Urgency, defaults to medium.
    pub priority: Option<TaskPriority>,
    /// Workflow state, defaults to todo.
    pub status: Option<TaskStatus>,
    /// Assignee, defaults to the creator.
    pub assigned_to: Option<UserId>,
    /// Optional recurrence rule.
    pub recurrence: Option<TaskRecurrence>,
    /// Task this one was generated from.
    pub parent_task_id: Option<TaskId>,
}

/// Partial task update. Absent fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// New urgency.
    pub priority: Option<TaskPriority>,
    /// New workflow state.
    pub status: Option<TaskStatus>,
    /// New assignee.
    pub assigned_to: Option<UserId>,
    /// New recurrence rule.
    pub recurrence: Option<TaskRecurrence>,
}

/// Repository port for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    async fn insert(&self, task: &Task) -> AppResult<()>;

    /// Finds a task by id.
    async fn find(&self, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Lists tasks matching the filter, ordered and truncated as requested.
    async fn list(&self, filter: &TaskFilter) -> AppResult<Vec<Task>>;

    /// Replaces a stored task. Missing tasks are `NotFound`.
    async fn update(&self, task: &Task) -> AppResult<()>;

    /// Deletes a task and returns whether it existed.
    async fn delete(&self, task_id: TaskId) -> AppResult<bool>;
}
