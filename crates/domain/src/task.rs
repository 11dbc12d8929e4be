//! Task entities, recurrence rules and dashboard statistics.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskpro_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::UserId;

/// Unique identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TaskId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid task id '{value}'")))
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(AppError::Validation(format!(
                "unknown task status '{value}'"
            ))),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Urgent.
    High,
}

impl TaskPriority {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Returns the sort rank, higher is more urgent.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(AppError::Validation(format!(
                "unknown task priority '{value}'"
            ))),
        }
    }
}

/// Cadence of a recurring task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringType {
    /// Every `interval` days.
    Daily,
    /// On the listed weekdays.
    Weekly,
    /// On a fixed day of the month.
    Monthly,
    /// Caller-defined cadence.
    Custom,
}

impl RecurringType {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for RecurringType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            _ => Err(AppError::Validation(format!(
                "unknown recurring type '{value}'"
            ))),
        }
    }
}

/// Recurrence rule attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecurrence {
    /// Cadence.
    pub recurring_type: RecurringType,
    /// Repeat every N units, at least 1.
    pub interval: Option<u32>,
    /// Weekdays, 0 = Sunday through 6 = Saturday.
    pub days: Vec<u8>,
    /// Day of month, 1 through 31.
    pub day_of_month: Option<u8>,
    /// Last date on which the task recurs.
    pub end_date: Option<DateTime<Utc>>,
}

impl TaskRecurrence {
    /// Validates the numeric ranges of the rule.
    pub fn validate(&self) -> AppResult<()> {
        if self.interval == Some(0) {
            return Err(AppError::Validation(
                "recurring interval must be at least 1".to_owned(),
            ));
        }

        if let Some(day) = self.days.iter().find(|day| **day > 6) {
            return Err(AppError::Validation(format!(
                "recurring weekday '{day}' must be between 0 and 6"
            )));
        }

        if let Some(day) = self.day_of_month
            && !(1..=31).contains(&day)
        {
            return Err(AppError::Validation(format!(
                "recurring day of month '{day}' must be between 1 and 31"
            )));
        }

        if self.recurring_type == RecurringType::Weekly && self.days.is_empty() {
            return Err(AppError::Validation(
                "weekly recurrence requires at least one weekday".to_owned(),
            ));
        }

        if self.recurring_type == RecurringType::Monthly && self.day_of_month.is_none() {
            return Err(AppError::Validation(
                "monthly recurrence requires a day of month".to_owned(),
            ));
        }

        Ok(())
    }
}

/// A unit of work assigned to one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier.
    pub id: TaskId,
    /// Short title.
    pub title: NonEmptyString,
    /// Free-form description.
    pub description: NonEmptyString,
    /// Deadline.
    pub due_date: DateTime<Utc>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Workflow state.
    pub status: TaskStatus,
    /// Identity the task belongs to.
    pub assigned_to: UserId,
    /// Identity that created the task.
    pub created_by: UserId,
    /// Optional recurrence rule.
    pub recurrence: Option<TaskRecurrence>,
    /// Task this one was generated from.
    pub parent_task_id: Option<TaskId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Returns the owning identity used by owner-or-permission checks.
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.assigned_to
    }

    /// Returns whether the identity is assignee or creator.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.assigned_to == user_id || self.created_by == user_id
    }

    /// Returns whether the task is past due and not completed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date < now
    }

    /// Returns whether the search term occurs in title or description, ignoring case.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.as_str().to_lowercase().contains(&term)
            || self.description.as_str().to_lowercase().contains(&term)
    }
}

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusCounts {
    /// Tasks not started.
    pub todo: u64,
    /// Tasks being worked on.
    #[serde(rename = "in-progress")]
    pub in_progress: u64,
    /// Tasks done.
    pub completed: u64,
}

/// Number of tasks per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPriorityCounts {
    /// Low priority tasks.
    pub low: u64,
    /// Medium priority tasks.
    pub medium: u64,
    /// High priority tasks.
    pub high: u64,
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Total number of tasks in scope.
    pub total: u64,
    /// Counts per status.
    pub status_counts: TaskStatusCounts,
    /// Counts per priority.
    pub priority_counts: TaskPriorityCounts,
    /// Tasks past due and not completed.
    pub overdue: u64,
    /// Rounded percentage of completed tasks.
    pub completion_rate: u8,
}

impl TaskStats {
    /// Computes statistics over the given tasks.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        let mut stats = Self::default();

        for task in tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.status_counts.todo += 1,
                TaskStatus::InProgress => stats.status_counts.in_progress += 1,
                TaskStatus::Completed => stats.status_counts.completed += 1,
            }
            match task.priority {
                TaskPriority::Low => stats.priority_counts.low += 1,
                TaskPriority::Medium => stats.priority_counts.medium += 1,
                TaskPriority::High => stats.priority_counts.high += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }

        stats.completion_rate = completion_rate(stats.status_counts.completed, stats.total);
        stats
    }
}

fn completion_rate(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let rate = (completed * 100 + total / 2) / total;
    u8::try_from(rate).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn task(status: TaskStatus, priority: TaskPriority, due_in_hours: i64) -> Task {
        let now = Utc::now();
        let owner = UserId::new();
        Task {
            id: TaskId::new(),
            title: NonEmptyString::new("Write report").unwrap_or_else(|_| panic!("title")),
            description: NonEmptyString::new("Quarterly numbers")
                .unwrap_or_else(|_| panic!("description")),
            due_date: now + Duration::hours(due_in_hours),
            priority,
            status,
            assigned_to: owner,
            created_by: owner,
            recurrence: None,
            parent_task_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_uses_kebab_case_storage_values() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(
            TaskStatus::from_str("in-progress").ok(),
            Some(TaskStatus::InProgress)
        );
        assert!(TaskStatus::from_str("in_progress").is_err());
    }

    #[test]
    fn defaults_match_new_task_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn recurrence_rejects_out_of_range_values() {
        let weekly = TaskRecurrence {
            recurring_type: RecurringType::Weekly,
            interval: Some(1),
            days: vec![1, 7],
            day_of_month: None,
            end_date: None,
        };
        assert!(weekly.validate().is_err());

        let monthly = TaskRecurrence {
            recurring_type: RecurringType::Monthly,
            interval: None,
            days: Vec::new(),
            day_of_month: Some(32),
            end_date: None,
        };
        assert!(monthly.validate().is_err());

        let zero_interval = TaskRecurrence {
            recurring_type: RecurringType::Daily,
            interval: Some(0),
            days: Vec::new(),
            day_of_month: None,
            end_date: None,
        };
        assert!(zero_interval.validate().is_err());
    }

    #[test]
    fn recurrence_accepts_valid_weekly_rule() {
        let weekly = TaskRecurrence {
            recurring_type: RecurringType::Weekly,
            interval: Some(2),
            days: vec![0, 3, 6],
            day_of_month: None,
            end_date: None,
        };
        assert!(weekly.validate().is_ok());
    }

    #[test]
    fn completed_tasks_are_never_overdue() {
        let now = Utc::now();
        assert!(task(TaskStatus::Todo, TaskPriority::Low, -1).is_overdue(now));
        assert!(!task(TaskStatus::Completed, TaskPriority::Low, -1).is_overdue(now));
        assert!(!task(TaskStatus::Todo, TaskPriority::Low, 1).is_overdue(now));
    }

    #[test]
    fn stats_count_statuses_priorities_and_overdue() {
        let tasks = vec![
            task(TaskStatus::Completed, TaskPriority::High, -5),
            task(TaskStatus::InProgress, TaskPriority::High, -5),
            task(TaskStatus::Todo, TaskPriority::Low, 5),
        ];

        let stats = TaskStats::from_tasks(&tasks, Utc::now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.status_counts.completed, 1);
        assert_eq!(stats.status_counts.in_progress, 1);
        assert_eq!(stats.status_counts.todo, 1);
        assert_eq!(stats.priority_counts.high, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn stats_of_nothing_report_zero_completion() {
        let tasks: Vec<Task> = Vec::new();
        let stats = TaskStats::from_tasks(&tasks, Utc::now());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn search_ignores_case() {
        let task = task(TaskStatus::Todo, TaskPriority::Low, 1);
        assert!(task.matches_search("REPORT"));
        assert!(task.matches_search("quarterly"));
        assert!(!task.matches_search("invoice"));
    }
}
