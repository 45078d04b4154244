use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{Handoff, HandoffStatus};
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_handoff(&self, handoff: Handoff) -> CoordResult<Handoff> {
        self.handoffs.insert(handoff.id, handoff.clone());
        Ok(handoff)
    }

    pub async fn get_handoff(&self, id: Uuid) -> CoordResult<Handoff> {
        self.handoffs
            .get(&id)
            .map(|h| h.clone())
            .ok_or_else(|| CoordError::not_found(format!("handoff {id}")))
    }

    pub async fn update_handoff<F>(&self, id: Uuid, f: F) -> CoordResult<Handoff>
    where
        F: FnOnce(&mut Handoff) -> CoordResult<()>,
    {
        let mut entry = self
            .handoffs
            .get_mut(&id)
            .ok_or_else(|| CoordError::not_found(format!("handoff {id}")))?;
        f(&mut entry)?;
        Ok(entry.clone())
    }

    /// Ordered ascending by `created_at` - first-come-first-served queue.
    pub async fn get_pending_handoffs(&self, to_agent: Option<&str>) -> Vec<Handoff> {
        let mut handoffs: Vec<Handoff> = self
            .handoffs
            .iter()
            .map(|e| e.value().clone())
            .filter(|h| h.status == HandoffStatus::Pending)
            .filter(|h| to_agent.map(|a| h.to_agent == a).unwrap_or(true))
            .collect();
        handoffs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        handoffs
    }

    pub async fn list_handoffs(
        &self,
        session_id: Option<Uuid>,
        agent: Option<&str>,
        status: Option<HandoffStatus>,
    ) -> Vec<Handoff> {
        let mut handoffs: Vec<Handoff> = self
            .handoffs
            .iter()
            .map(|e| e.value().clone())
            .filter(|h| session_id.map(|s| h.session_id == s).unwrap_or(true))
            .filter(|h| {
                agent
                    .map(|a| h.from_agent == a || h.to_agent == a)
                    .unwrap_or(true)
            })
            .filter(|h| status.map(|s| h.status == s).unwrap_or(true))
            .collect();
        handoffs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        handoffs
    }
}
