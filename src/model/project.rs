use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub features: Vec<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            features: Vec::new(),
            archived: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    /// Clamps any unrecognized priority string to `Medium`, matching the
    /// plan promoter's tolerance for slightly-off LLM output.
    pub fn parse_or_medium(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Doing,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub feature: Option<String>,
    pub status: TaskStatus,
    pub assignee: Option<String>,
    pub task_order: u32,
    pub updated_at: DateTime<Utc>,
    pub archived: bool,
    pub archived_by: Option<String>,
    pub archived_reason: Option<String>,
}

impl Task {
    pub fn new(project_id: Uuid, title: impl Into<String>, task_order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            feature: None,
            status: TaskStatus::Todo,
            assignee: None,
            task_order,
            updated_at: Utc::now(),
            archived: false,
            archived_by: None,
            archived_reason: None,
        }
    }

    pub fn archive(&mut self, by: &str, reason: impl Into<String>) {
        self.archived = true;
        self.archived_by = Some(by.to_string());
        self.archived_reason = Some(reason.into());
        self.updated_at = Utc::now();
    }
}
