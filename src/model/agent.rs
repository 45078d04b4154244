use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Inactive,
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub capabilities: Vec<String>,
    pub status: AgentStatus,
    pub last_seen: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl Agent {
    pub fn new(name: impl Into<String>, capabilities: Vec<String>) -> Self {
        Self {
            name: name.into(),
            capabilities,
            status: AgentStatus::Active,
            last_seen: Utc::now(),
            metadata: serde_json::json!({}),
        }
    }
}
