use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Success,
    Failure,
    Technical,
    Process,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub pattern_type: PatternType,
    pub domain: String,
    pub description: String,
    pub action: String,
    pub outcome: Option<String>,
    /// Free-form JSON context. `context["source_session_id"]` is a loose
    /// string pointer back to the session this pattern was harvested
    /// from, not a foreign key - a pattern survives even if the session
    /// it references is later deleted.
    pub context: serde_json::Value,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub embedding: Option<Vec<f32>>,
}

impl Pattern {
    pub fn embedding_text(&self) -> String {
        format!(
            "{}. {}. {}",
            self.description,
            self.action,
            self.outcome.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternObservation {
    pub id: Uuid,
    pub pattern_id: Uuid,
    pub session_id: Option<Uuid>,
    pub observed_at: DateTime<Utc>,
    pub rating: Option<f32>,
    pub notes: Option<String>,
}

/// A harvested-pattern candidate surfaced by the LLM extractor, before it
/// has been assigned an id or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCandidate {
    pub pattern_type: PatternType,
    pub domain: String,
    pub description: String,
    pub action: String,
    pub outcome: Option<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternStats {
    pub total_patterns: u64,
    pub total_observations: u64,
    pub by_type: std::collections::HashMap<String, u64>,
}
