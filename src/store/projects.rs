use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{Project, Task, TaskStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_project(&self, project: Project) -> CoordResult<Project> {
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    pub async fn get_project(&self, id: Uuid) -> CoordResult<Project> {
        self.projects
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| CoordError::not_found(format!("project {id}")))
    }

    pub async fn list_active_projects(&self) -> Vec<Project> {
        self.projects
            .iter()
            .map(|e| e.value().clone())
            .filter(|p| !p.archived)
            .collect()
    }

    pub async fn archive_project(&self, id: Uuid) -> CoordResult<Project> {
        let mut project = self
            .projects
            .get_mut(&id)
            .ok_or_else(|| CoordError::not_found(format!("project {id}")))?;
        project.archived = true;
        Ok(project.clone())
    }

    pub async fn insert_task(&self, task: Task) -> CoordResult<Task> {
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    pub async fn list_tasks(&self, project_id: Uuid) -> Vec<Task> {
        self.tasks
            .iter()
            .map(|e| e.value().clone())
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    /// Archives tasks whose status is in `status_filter` and whose
    /// `updated_at` is older than `older_than`. Returns the archived count.
    pub async fn bulk_archive_tasks(
        &self,
        status_filter: &[TaskStatus],
        older_than: DateTime<Utc>,
        archived_by: &str,
        reason: &str,
    ) -> u64 {
        let mut count = 0u64;
        for mut entry in self.tasks.iter_mut() {
            let task = entry.value_mut();
            if !task.archived
                && status_filter.contains(&task.status)
                && task.updated_at < older_than
            {
                task.archive(archived_by, reason);
                count += 1;
            }
        }
        count
    }
}
