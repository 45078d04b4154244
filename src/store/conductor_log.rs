use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{ConductorLogEntry, DelegationOutcome, DelegationStats, OutcomeSummary};
use std::collections::HashMap;
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_conductor_log(&self, entry: ConductorLogEntry) -> CoordResult<ConductorLogEntry> {
        self.conductor_logs.insert(entry.id, entry.clone());
        Ok(entry)
    }

    pub async fn update_delegation_outcome(
        &self,
        id: Uuid,
        outcome: DelegationOutcome,
        notes: Option<String>,
    ) -> CoordResult<ConductorLogEntry> {
        let mut entry = self
            .conductor_logs
            .get_mut(&id)
            .ok_or_else(|| CoordError::not_found(format!("conductor log {id}")))?;
        entry.outcome = Some(outcome);
        entry.outcome_notes = notes;
        entry.resolved_at = Some(chrono::Utc::now());
        Ok(entry.clone())
    }

    /// Chronological entries plus a `{total, success, failure, partial,
    /// pending}` summary where `pending` counts entries with a null
    /// outcome.
    pub async fn work_order_reasoning(&self, work_order_id: Uuid) -> (Vec<ConductorLogEntry>, OutcomeSummary) {
        let mut entries: Vec<ConductorLogEntry> = self
            .conductor_logs
            .iter()
            .map(|e| e.value().clone())
            .filter(|e| e.work_order_id == work_order_id)
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut summary = OutcomeSummary::default();
        for e in &entries {
            summary.total += 1;
            match e.outcome {
                Some(DelegationOutcome::Success) => summary.success += 1,
                Some(DelegationOutcome::Failure) => summary.failure += 1,
                Some(DelegationOutcome::Partial) => summary.partial += 1,
                None => summary.pending += 1,
            }
        }
        (entries, summary)
    }

    pub async fn aggregate_delegation_stats(&self) -> Vec<DelegationStats> {
        let mut groups: HashMap<(String, String), Vec<ConductorLogEntry>> = HashMap::new();
        for e in self.conductor_logs.iter() {
            groups
                .entry((e.conductor_agent.clone(), e.delegation_target.clone()))
                .or_default()
                .push(e.value().clone());
        }

        groups
            .into_iter()
            .map(|((conductor_agent, delegation_target), entries)| {
                let total = entries.len() as u64;
                let success = entries
                    .iter()
                    .filter(|e| e.outcome == Some(DelegationOutcome::Success))
                    .count();
                let failure = entries
                    .iter()
                    .filter(|e| e.outcome == Some(DelegationOutcome::Failure))
                    .count();
                let partial = entries
                    .iter()
                    .filter(|e| e.outcome == Some(DelegationOutcome::Partial))
                    .count();
                let denom = success + failure + partial;
                let success_rate = if denom == 0 {
                    0.0
                } else {
                    success as f32 / denom as f32
                };
                let confidences: Vec<f32> = entries.iter().filter_map(|e| e.confidence).collect();
                let mean_confidence = if confidences.is_empty() {
                    None
                } else {
                    Some(confidences.iter().sum::<f32>() / confidences.len() as f32)
                };
                DelegationStats {
                    conductor_agent,
                    delegation_target,
                    total,
                    success_rate,
                    mean_confidence,
                }
            })
            .collect()
    }
}
