use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationOutcome {
    Success,
    Failure,
    Partial,
}

impl std::str::FromStr for DelegationOutcome {
    type Err = crate::error::CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "partial" => Ok(Self::Partial),
            other => Err(crate::error::CoordError::validation(format!(
                "invalid outcome '{other}', expected one of success, failure, partial"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConductorLogEntry {
    pub id: Uuid,
    pub work_order_id: Uuid,
    /// Optional parent task identifier grouping several work orders under
    /// one mission - a loose string tag, not a foreign key.
    pub mission_id: Option<String>,
    pub conductor_agent: String,
    pub delegation_target: String,
    pub reasoning: String,
    /// Which context slices were injected into the sub-agent's prompt.
    pub injected_context: serde_json::Value,
    pub decision_factors: Vec<String>,
    pub confidence: Option<f32>,
    pub outcome: Option<DelegationOutcome>,
    pub outcome_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub total: u64,
    pub success: u64,
    pub failure: u64,
    pub partial: u64,
    pub pending: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationStats {
    pub conductor_agent: String,
    pub delegation_target: String,
    pub total: u64,
    pub success_rate: f32,
    pub mean_confidence: Option<f32>,
}
