//! Auto-archive loop (C17). The original sleeps the full interval *after*
//! each work cycle; this deliberately prefers a fixed-rate
//! `tokio::time::interval` ticker instead, per the coroutine-vs-channels
//! design guidance - drift from a slow cycle does not compound, and
//! cancellation is cooperative via `CancellationToken` rather than
//! `task.abort()`.

use crate::model::{Project, TaskStatus};
use crate::store::MemoryStore;
use chrono::{Duration, Utc};
use std::time::Duration as StdDuration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const DEFAULT_INTERVAL_SECS: u64 = 3600;
const PROJECT_STALE_AFTER: Duration = Duration::hours(24);
const DEFAULT_TASK_STALE_DAYS: i64 = 30;

pub struct AutoArchiveLoop {
    store: MemoryStore,
    interval: StdDuration,
}

impl AutoArchiveLoop {
    pub fn new(store: MemoryStore, interval_secs: u64) -> Self {
        Self {
            store,
            interval: StdDuration::from_secs(interval_secs),
        }
    }

    pub async fn run(&self, token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {
                    self.archive_completed_projects().await;
                    self.archive_stale_tasks(&[TaskStatus::Todo], DEFAULT_TASK_STALE_DAYS).await;
                }
            }
        }
    }

    /// Archives any non-archived project whose tasks are all `done` and
    /// whose newest task `updated_at` is older than 24 hours. Projects
    /// with zero tasks are left alone.
    pub async fn archive_completed_projects(&self) -> Vec<Project> {
        debug!("checking for completed projects to archive");
        let cutoff = Utc::now() - PROJECT_STALE_AFTER;
        let mut archived = Vec::new();

        for project in self.store.list_active_projects().await {
            let tasks = self.store.list_tasks(project.id).await;
            if tasks.is_empty() {
                continue;
            }
            if !tasks.iter().all(|t| t.status == TaskStatus::Done) {
                continue;
            }
            let newest = tasks.iter().map(|t| t.updated_at).max().unwrap();
            if newest < cutoff {
                if let Ok(project) = self.store.archive_project(project.id).await {
                    info!(project = %project.title, "auto-archived completed project");
                    archived.push(project);
                }
            }
        }
        archived
    }

    /// Archives tasks in `status_filter` older than `days_threshold` days,
    /// recording `archived_by = "auto-archive"` and a reason string.
    pub async fn archive_stale_tasks(&self, status_filter: &[TaskStatus], days_threshold: i64) -> u64 {
        debug!(days = days_threshold, "checking for stale tasks to archive");
        let older_than = Utc::now() - Duration::days(days_threshold);
        let statuses = status_filter.iter().map(|s| format!("{s:?}").to_lowercase()).collect::<Vec<_>>().join(", ");
        let reason = format!("Auto-archived: stale task in '{statuses}' status for >{days_threshold} days");
        let count = self
            .store
            .bulk_archive_tasks(status_filter, older_than, "auto-archive", &reason)
            .await;
        if count > 0 {
            info!(count, "auto-archived stale tasks");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Task};

    #[tokio::test]
    async fn a_project_with_no_tasks_is_never_archived() {
        let store = MemoryStore::new();
        let project = store.insert_project(Project::new("empty")).await.unwrap();
        let archiver = AutoArchiveLoop::new(store, DEFAULT_INTERVAL_SECS);
        let archived = archiver.archive_completed_projects().await;
        assert!(archived.is_empty());
        let reloaded = archiver.store.get_project(project.id).await.unwrap();
        assert!(!reloaded.archived);
    }

    #[tokio::test]
    async fn project_with_all_tasks_done_for_over_a_day_is_archived() {
        let store = MemoryStore::new();
        let project = store.insert_project(Project::new("shipped")).await.unwrap();
        let mut task = Task::new(project.id, "do it", 0);
        task.status = TaskStatus::Done;
        task.updated_at = Utc::now() - Duration::hours(25);
        store.insert_task(task).await.unwrap();

        let archiver = AutoArchiveLoop::new(store, DEFAULT_INTERVAL_SECS);
        let archived = archiver.archive_completed_projects().await;
        assert_eq!(archived.len(), 1);
    }

    #[tokio::test]
    async fn project_with_a_recently_done_task_is_not_archived_yet() {
        let store = MemoryStore::new();
        let project = store.insert_project(Project::new("almost done")).await.unwrap();
        let mut task = Task::new(project.id, "do it", 0);
        task.status = TaskStatus::Done;
        task.updated_at = Utc::now() - Duration::hours(1);
        store.insert_task(task).await.unwrap();

        let archiver = AutoArchiveLoop::new(store, DEFAULT_INTERVAL_SECS);
        assert!(archiver.archive_completed_projects().await.is_empty());
    }

    #[tokio::test]
    async fn stale_todo_tasks_are_archived_with_the_auto_archive_reason() {
        let store = MemoryStore::new();
        let project = store.insert_project(Project::new("p")).await.unwrap();
        let mut task = Task::new(project.id, "stale", 0);
        task.updated_at = Utc::now() - Duration::days(31);
        store.insert_task(task.clone()).await.unwrap();

        let archiver = AutoArchiveLoop::new(store, DEFAULT_INTERVAL_SECS);
        let count = archiver.archive_stale_tasks(&[TaskStatus::Todo], 30).await;
        assert_eq!(count, 1);
        let reloaded = archiver.store.list_tasks(project.id).await;
        assert_eq!(reloaded[0].archived_by.as_deref(), Some("auto-archive"));
    }
}
