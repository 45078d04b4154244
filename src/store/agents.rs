use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{Agent, AgentStatus};
use chrono::Utc;

impl MemoryStore {
    pub async fn upsert_agent(
        &self,
        name: &str,
        capabilities: Vec<String>,
        metadata: serde_json::Value,
    ) -> CoordResult<Agent> {
        let mut agent = self
            .agents
            .entry(name.to_string())
            .or_insert_with(|| Agent::new(name, Vec::new()));
        agent.capabilities = capabilities;
        agent.metadata = metadata;
        agent.status = AgentStatus::Active;
        agent.last_seen = Utc::now();
        Ok(agent.clone())
    }

    pub async fn heartbeat(&self, name: &str) -> CoordResult<Agent> {
        let mut agent = self
            .agents
            .get_mut(name)
            .ok_or_else(|| CoordError::not_found(format!("agent {name}")))?;
        agent.last_seen = Utc::now();
        agent.status = AgentStatus::Active;
        Ok(agent.clone())
    }

    pub async fn set_busy(&self, name: &str) -> CoordResult<Agent> {
        let mut agent = self
            .agents
            .get_mut(name)
            .ok_or_else(|| CoordError::not_found(format!("agent {name}")))?;
        agent.status = AgentStatus::Busy;
        Ok(agent.clone())
    }

    pub async fn get_agent(&self, name: &str) -> Option<Agent> {
        self.agents.get(name).map(|a| a.clone())
    }

    pub async fn list_agents(&self, status: Option<AgentStatus>) -> Vec<Agent> {
        let mut agents: Vec<Agent> = self
            .agents
            .iter()
            .map(|e| e.value().clone())
            .filter(|a| status.map(|s| a.status == s).unwrap_or(true))
            .collect();
        agents.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        agents
    }

    pub async fn deactivate_agent(&self, name: &str) -> CoordResult<Agent> {
        let mut agent = self
            .agents
            .get_mut(name)
            .ok_or_else(|| CoordError::not_found(format!("agent {name}")))?;
        agent.status = AgentStatus::Inactive;
        Ok(agent.clone())
    }
}
