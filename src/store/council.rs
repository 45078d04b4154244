use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{Decision, ValidationDecision};
use chrono::Utc;
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_decision(&self, decision: ValidationDecision) -> CoordResult<ValidationDecision> {
        self.decisions.insert(decision.id, decision.clone());
        Ok(decision)
    }

    pub async fn get_decision(&self, id: Uuid) -> CoordResult<ValidationDecision> {
        self.decisions
            .get(&id)
            .map(|d| d.clone())
            .ok_or_else(|| CoordError::not_found(format!("decision {id}")))
    }

    /// `decision == pending_human && resolved_at IS NULL`, ordered
    /// `created_at asc`.
    pub async fn queue(&self) -> Vec<ValidationDecision> {
        let mut queue: Vec<ValidationDecision> = self
            .decisions
            .iter()
            .map(|e| e.value().clone())
            .filter(|d| d.decision == Decision::PendingHuman && d.resolved_at.is_none())
            .collect();
        queue.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        queue
    }

    pub async fn resolve_decision(&self, id: Uuid, approve: bool) -> CoordResult<ValidationDecision> {
        let mut entry = self
            .decisions
            .get_mut(&id)
            .ok_or_else(|| CoordError::not_found(format!("decision {id}")))?;
        if entry.decision != Decision::PendingHuman {
            return Err(CoordError::conflict(format!(
                "decision {id} is not pending human review"
            )));
        }
        entry.decision = if approve {
            Decision::Approved
        } else {
            Decision::Blocked
        };
        entry.decided_by = "human".to_string();
        entry.resolved_at = Some(Utc::now());
        Ok(entry.clone())
    }

    /// Most recent first, optionally filtered by decision, capped 1..=500
    /// (default 50) - enforced by the caller in the service layer.
    pub async fn list_decisions(&self, decision: Option<Decision>, limit: usize) -> Vec<ValidationDecision> {
        let mut decisions: Vec<ValidationDecision> = self
            .decisions
            .iter()
            .map(|e| e.value().clone())
            .filter(|d| decision.map(|f| d.decision == f).unwrap_or(true))
            .collect();
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        decisions.truncate(limit);
        decisions
    }
}
