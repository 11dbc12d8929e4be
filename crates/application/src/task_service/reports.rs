use std::collections::BTreeMap;

use chrono::Utc;
use taskpro_core::AppResult;
use taskpro_domain::{Permission, TaskStats, TaskStatus, UserId, UserIdentity};

use crate::TaskFilter;

use super::{AssigneeWorkload, ReportSummary, TaskService};

impl TaskService {
    /// Organisation-wide report. Requires `reports:view` or `reports:export`.
    pub async fn report_summary(&self, actor: &UserIdentity) -> AppResult<ReportSummary> {
        self.authorization_service.require_any(
            Some(actor),
            &[Permission::ReportsView, Permission::ReportsExport],
        )?;

        let tasks = self.task_repository.list(&TaskFilter::default()).await?;
        let now = Utc::now();

        let mut workloads: BTreeMap<UserId, AssigneeWorkload> = BTreeMap::new();
        for task in &tasks {
            let workload = workloads
                .entry(task.assigned_to)
                .or_insert(AssigneeWorkload {
                    assignee: task.assigned_to,
                    total: 0,
                    completed: 0,
                    overdue: 0,
                });
            workload.total += 1;
            if task.status == TaskStatus::Completed {
                workload.completed += 1;
            }
            if task.is_overdue(now) {
                workload.overdue += 1;
            }
        }

        let mut per_assignee: Vec<AssigneeWorkload> = workloads.into_values().collect();
        per_assignee.sort_by(|left, right| right.total.cmp(&left.total));

        Ok(ReportSummary {
            stats: TaskStats::from_tasks(&tasks, now),
            per_assignee,
        })
    }
}
