use crate::error::CoordResult;
use crate::model::conductor_log::{DelegationStats, OutcomeSummary};
use crate::model::{ConductorLogEntry, DelegationOutcome};
use crate::store::MemoryStore;
use chrono::Utc;
use uuid::Uuid;

pub struct ConductorLogStore {
    store: MemoryStore,
}

impl ConductorLogStore {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn log_reasoning(
        &self,
        work_order_id: Uuid,
        mission_id: Option<String>,
        conductor_agent: &str,
        delegation_target: &str,
        reasoning: &str,
        injected_context: serde_json::Value,
        decision_factors: Vec<String>,
        confidence: Option<f32>,
    ) -> CoordResult<ConductorLogEntry> {
        let entry = ConductorLogEntry {
            id: Uuid::new_v4(),
            work_order_id,
            mission_id,
            conductor_agent: conductor_agent.to_string(),
            delegation_target: delegation_target.to_string(),
            reasoning: reasoning.to_string(),
            injected_context,
            decision_factors,
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
            outcome: None,
            outcome_notes: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.store.insert_conductor_log(entry).await
    }

    pub async fn update_outcome(
        &self,
        id: Uuid,
        outcome: DelegationOutcome,
        notes: Option<String>,
    ) -> CoordResult<ConductorLogEntry> {
        self.store.update_delegation_outcome(id, outcome, notes).await
    }

    pub async fn work_order_reasoning(&self, work_order_id: Uuid) -> (Vec<ConductorLogEntry>, OutcomeSummary) {
        self.store.work_order_reasoning(work_order_id).await
    }

    pub async fn aggregate_stats(&self) -> Vec<DelegationStats> {
        self.store.aggregate_delegation_stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pending_counts_entries_with_no_outcome_yet() {
        let log = ConductorLogStore::new(MemoryStore::new());
        let wo = Uuid::new_v4();
        log.log_reasoning(
            wo,
            None,
            "conductor-1",
            "backend-agent",
            "delegating",
            serde_json::json!({}),
            Vec::new(),
            Some(0.9),
        )
        .await
        .unwrap();
        let (_, summary) = log.work_order_reasoning(wo).await;
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.total, 1);
    }

    #[tokio::test]
    async fn success_rate_excludes_pending_entries_from_the_denominator() {
        let log = ConductorLogStore::new(MemoryStore::new());
        let entry = log
            .log_reasoning(
                Uuid::new_v4(),
                None,
                "conductor-1",
                "backend-agent",
                "delegating",
                serde_json::json!({}),
                Vec::new(),
                Some(0.9),
            )
            .await
            .unwrap();
        log.log_reasoning(
            Uuid::new_v4(),
            None,
            "conductor-1",
            "backend-agent",
            "delegating",
            serde_json::json!({}),
            Vec::new(),
            Some(0.5),
        )
        .await
        .unwrap();
        log.update_outcome(entry.id, DelegationOutcome::Success, None).await.unwrap();

        let stats = log.aggregate_stats().await;
        let group = stats.iter().find(|s| s.delegation_target == "backend-agent").unwrap();
        assert_eq!(group.success_rate, 1.0);
    }

    #[tokio::test]
    async fn confidence_is_clamped_into_zero_one() {
        let log = ConductorLogStore::new(MemoryStore::new());
        let entry = log
            .log_reasoning(
                Uuid::new_v4(),
                None,
                "c",
                "t",
                "r",
                serde_json::json!({}),
                Vec::new(),
                Some(5.0),
            )
            .await
            .unwrap();
        assert_eq!(entry.confidence, Some(1.0));
    }

    #[tokio::test]
    async fn outcome_notes_are_stored_on_resolution() {
        let log = ConductorLogStore::new(MemoryStore::new());
        let entry = log
            .log_reasoning(
                Uuid::new_v4(),
                Some("phase3_orchestration".to_string()),
                "c",
                "t",
                "r",
                serde_json::json!({"kb_docs": 2}),
                vec!["requires_terminal_access".to_string()],
                None,
            )
            .await
            .unwrap();
        let updated = log
            .update_outcome(entry.id, DelegationOutcome::Partial, Some("8/12 tests passed".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.outcome_notes.as_deref(), Some("8/12 tests passed"));
        assert_eq!(updated.mission_id.as_deref(), Some("phase3_orchestration"));
    }
}
