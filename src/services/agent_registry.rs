use crate::error::CoordResult;
use crate::model::{Agent, AgentStatus};
use crate::store::MemoryStore;

pub struct AgentRegistry {
    store: MemoryStore,
}

impl AgentRegistry {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn register(
        &self,
        name: &str,
        capabilities: Vec<String>,
        metadata: serde_json::Value,
    ) -> CoordResult<Agent> {
        self.store.upsert_agent(name, capabilities, metadata).await
    }

    pub async fn heartbeat(&self, name: &str) -> CoordResult<Agent> {
        self.store.heartbeat(name).await
    }

    pub async fn set_busy(&self, name: &str) -> CoordResult<Agent> {
        self.store.set_busy(name).await
    }

    pub async fn get(&self, name: &str) -> Option<Agent> {
        self.store.get_agent(name).await
    }

    pub async fn list(&self, status: Option<AgentStatus>) -> Vec<Agent> {
        self.store.list_agents(status).await
    }

    pub async fn deactivate(&self, name: &str) -> CoordResult<Agent> {
        self.store.deactivate_agent(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn heartbeat_on_unknown_agent_is_not_found() {
        let registry = AgentRegistry::new(MemoryStore::new());
        assert!(registry.heartbeat("ghost").await.is_err());
    }

    #[tokio::test]
    async fn register_is_an_upsert_by_name() {
        let registry = AgentRegistry::new(MemoryStore::new());
        registry
            .register("alice", vec!["frontend".to_string()], serde_json::json!({}))
            .await
            .unwrap();
        let updated = registry
            .register("alice", vec!["backend".to_string()], serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(updated.capabilities, vec!["backend".to_string()]);
        assert_eq!(registry.list(None).await.len(), 1);
    }

    #[tokio::test]
    async fn set_busy_marks_an_existing_agent() {
        let registry = AgentRegistry::new(MemoryStore::new());
        registry
            .register("alice", vec!["frontend".to_string()], serde_json::json!({}))
            .await
            .unwrap();
        let busy = registry.set_busy("alice").await.unwrap();
        assert_eq!(busy.status, AgentStatus::Busy);
        assert_eq!(registry.list(Some(AgentStatus::Busy)).await.len(), 1);
    }
}
