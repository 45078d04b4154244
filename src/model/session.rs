use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub agent_name: String,
    pub project_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub key_events: Vec<String>,
    pub decisions_made: Vec<String>,
    pub outcomes: Vec<String>,
    pub next_steps: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub metadata: serde_json::Value,
}

impl Session {
    pub fn new(agent_name: impl Into<String>, project_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            agent_name: agent_name.into(),
            project_id,
            started_at: Utc::now(),
            ended_at: None,
            summary: None,
            key_events: Vec::new(),
            decisions_made: Vec::new(),
            outcomes: Vec::new(),
            next_steps: Vec::new(),
            embedding: None,
            metadata: serde_json::json!({}),
        }
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// A single structured event recorded within a session, in the order it
/// occurred. Total ordering within a session is by `(occurred_at, seq)`:
/// `seq` breaks ties for events recorded within the same millisecond.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: Uuid,
    pub session_id: Uuid,
    pub seq: u64,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub data: serde_json::Value,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub tools_used: Vec<String>,
    /// Freeform taxonomy, e.g. `message_type = "command"`, `subtype = "task_request"`.
    pub message_type: Option<String>,
    pub subtype: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub embedding: Option<Vec<f32>>,
}

/// Result of LLM-backed session summarization (C8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub summary: String,
    pub key_events: Vec<String>,
    pub decisions_made: Vec<String>,
    pub outcomes: Vec<String>,
    pub next_steps: Vec<String>,
}
