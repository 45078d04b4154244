use crate::error::CoordResult;
use crate::model::{Handoff, HandoffStatus};
use crate::store::MemoryStore;
use uuid::Uuid;

pub struct HandoffMachine {
    store: MemoryStore,
}

impl HandoffMachine {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        session_id: Uuid,
        from_agent: &str,
        to_agent: &str,
        context: serde_json::Value,
    ) -> CoordResult<Handoff> {
        self.store
            .insert_handoff(Handoff::new(session_id, from_agent, to_agent, context))
            .await
    }

    pub async fn accept(&self, id: Uuid) -> CoordResult<Handoff> {
        self.store
            .update_handoff(id, |h| h.transition(HandoffStatus::Accepted))
            .await
    }

    pub async fn complete(&self, id: Uuid) -> CoordResult<Handoff> {
        self.store
            .update_handoff(id, |h| h.transition(HandoffStatus::Completed))
            .await
    }

    pub async fn reject(&self, id: Uuid, reason: Option<String>) -> CoordResult<Handoff> {
        self.store
            .update_handoff(id, |h| {
                h.transition(HandoffStatus::Rejected)?;
                h.rejected_reason = reason.clone();
                Ok(())
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> CoordResult<Handoff> {
        self.store.get_handoff(id).await
    }

    pub async fn pending_for(&self, to_agent: Option<&str>) -> Vec<Handoff> {
        self.store.get_pending_handoffs(to_agent).await
    }

    pub async fn list(
        &self,
        session_id: Option<Uuid>,
        agent: Option<&str>,
        status: Option<HandoffStatus>,
    ) -> Vec<Handoff> {
        self.store.list_handoffs(session_id, agent, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn a_completed_handoff_cannot_be_rejected_afterwards() {
        let machine = HandoffMachine::new(MemoryStore::new());
        let handoff = machine
            .create(Uuid::new_v4(), "alice", "bob", serde_json::json!({}))
            .await
            .unwrap();
        machine.accept(handoff.id).await.unwrap();
        machine.complete(handoff.id).await.unwrap();

        let result = machine.reject(handoff.id, Some("too late".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn no_handoff_is_ever_left_in_a_non_terminal_state_by_a_conflicting_write() {
        let machine = HandoffMachine::new(MemoryStore::new());
        let handoff = machine
            .create(Uuid::new_v4(), "alice", "bob", serde_json::json!({}))
            .await
            .unwrap();
        // Skipping straight to Completed from Pending is illegal.
        let err = machine.complete(handoff.id).await;
        assert!(err.is_err());
        let reloaded = machine.get(handoff.id).await.unwrap();
        assert_eq!(reloaded.status, HandoffStatus::Pending);
    }
}
