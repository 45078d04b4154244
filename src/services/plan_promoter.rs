//! Plan promoter (C16): turns a plan document into a project plus a set of
//! tasks extracted by the LLM provider. The project is created before the
//! AI extraction call runs, so a failed extraction still leaves a project
//! the caller can retry against.

use crate::error::{CoordError, CoordResult};
use crate::llm::LlmProvider;
use crate::model::{Project, Task, TaskPriority};
use crate::store::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub struct PlanPromoter {
    store: MemoryStore,
    llm: Arc<dyn LlmProvider>,
    documents_base_path: String,
}

/// Mirrors `promote_plan`'s failure contract: an AI extraction failure is
/// reported with the project id it already created, so the caller can
/// retry extraction without recreating the project.
#[derive(Debug)]
pub struct PromoteFailure {
    pub project_id: Uuid,
    pub error: CoordError,
}

impl PlanPromoter {
    pub fn new(store: MemoryStore, llm: Arc<dyn LlmProvider>, documents_base_path: String) -> Self {
        Self {
            store,
            llm,
            documents_base_path,
        }
    }

    pub async fn promote_plan(&self, plan_path: &str, plan_name: &str) -> Result<(Project, Vec<Task>), PromoteFailure> {
        let full_path = Path::new(&self.documents_base_path).join(plan_path);
        let content = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| PromoteFailure {
                project_id: Uuid::nil(),
                error: CoordError::dependency(format!("failed to read plan '{full_path:?}': {e}")),
            })?;

        let project = self
            .store
            .insert_project(Project::new(plan_name))
            .await
            .map_err(|e| PromoteFailure {
                project_id: Uuid::nil(),
                error: e,
            })?;

        let extracted = self.llm.extract_tasks(&content).await.map_err(|e| PromoteFailure {
            project_id: project.id,
            error: e,
        })?;

        let mut tasks = Vec::with_capacity(extracted.len());
        for (i, candidate) in extracted.into_iter().enumerate() {
            let mut task = Task::new(project.id, candidate.title, i as u32);
            task.description = candidate.description;
            task.priority = TaskPriority::parse_or_medium(&candidate.priority);
            task.feature = candidate.feature;
            let task = self.store.insert_task(task).await.map_err(|e| PromoteFailure {
                project_id: project.id,
                error: e,
            })?;
            tasks.push(task);
        }

        Ok((project, tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::DeterministicLlmProvider;

    #[tokio::test]
    async fn missing_plan_file_fails_before_creating_a_project() {
        let promoter = PlanPromoter::new(
            MemoryStore::new(),
            Arc::new(DeterministicLlmProvider),
            "/nonexistent/docs".to_string(),
        );
        let result = promoter.promote_plan("plan.md", "ghost project").await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().project_id, Uuid::nil());
    }

    #[tokio::test]
    async fn a_readable_plan_produces_a_project_and_ordered_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.md");
        tokio::fs::write(&plan_path, "# Plan\n- Build API\n- Write docs\n")
            .await
            .unwrap();

        let promoter = PlanPromoter::new(
            MemoryStore::new(),
            Arc::new(DeterministicLlmProvider),
            dir.path().to_string_lossy().to_string(),
        );
        let (project, tasks) = promoter.promote_plan("plan.md", "my project").await.unwrap();
        assert_eq!(project.title, "my project");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_order, 0);
        assert_eq!(tasks[1].task_order, 1);
    }
}
