//! Validation council (C13): decides what to do with a risk level, then
//! tracks human resolution of anything it could not auto-decide.

use crate::error::CoordResult;
use crate::model::{Decision, RiskLevel, ValidationDecision};
use crate::store::MemoryStore;
use chrono::Utc;
use uuid::Uuid;

pub struct ValidationCouncil {
    store: MemoryStore,
}

/// Pure decision function - same `_DECISION_MAP`/`_MESSAGE_MAP` shape as
/// the original: every risk level maps to exactly one decision and one
/// canned message, with `pending_human` the only case that leaves a human
/// in the loop.
pub fn decide(risk: RiskLevel) -> (Decision, &'static str) {
    match risk {
        RiskLevel::Low => (Decision::Approved, "Low risk, auto-approved"),
        RiskLevel::Medium => (Decision::Approved, "Medium risk, auto-approved with logging"),
        RiskLevel::High => (Decision::PendingHuman, "High risk, awaiting human review"),
        RiskLevel::Destructive => (Decision::Blocked, "Destructive risk, automatically blocked"),
    }
}

impl ValidationCouncil {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn evaluate(&self, subject: &str, risk: RiskLevel) -> CoordResult<ValidationDecision> {
        let (decision, message) = decide(risk);
        let record = ValidationDecision {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            risk_level: risk,
            decision,
            decided_by: "auto".to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
            // Only a human resolving a queued decision sets this - see
            // `MemoryStore::resolve_decision`.
            resolved_at: None,
        };
        self.store.insert_decision(record).await
    }

    pub async fn queue(&self) -> Vec<ValidationDecision> {
        self.store.queue().await
    }

    pub async fn resolve(&self, id: Uuid, approve: bool) -> CoordResult<ValidationDecision> {
        self.store.resolve_decision(id, approve).await
    }

    pub async fn list(&self, decision: Option<Decision>, limit: usize) -> Vec<ValidationDecision> {
        self.store.list_decisions(decision, limit.clamp(1, 500)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn high_risk_lands_in_the_human_queue() {
        let council = ValidationCouncil::new(MemoryStore::new());
        council.evaluate("deploy prod", RiskLevel::High).await.unwrap();
        assert_eq!(council.queue().await.len(), 1);
    }

    #[tokio::test]
    async fn destructive_risk_is_blocked_and_never_queued() {
        let council = ValidationCouncil::new(MemoryStore::new());
        let decision = council.evaluate("drop table", RiskLevel::Destructive).await.unwrap();
        assert_eq!(decision.decision, Decision::Blocked);
        assert!(decision.resolved_at.is_none());
        assert!(council.queue().await.is_empty());
    }

    #[tokio::test]
    async fn resolving_a_queued_decision_removes_it_from_the_queue() {
        let council = ValidationCouncil::new(MemoryStore::new());
        let decision = council.evaluate("deploy prod", RiskLevel::High).await.unwrap();
        council.resolve(decision.id, true).await.unwrap();
        assert!(council.queue().await.is_empty());
    }
}
