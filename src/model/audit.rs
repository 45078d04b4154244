use super::council::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub source: String,
    pub agent_name: Option<String>,
    pub session_id: Option<Uuid>,
    pub action: String,
    pub target: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub outcome: Option<String>,
    pub detail: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}
