use crate::error::CoordResult;
use crate::model::{AuditEntry, RiskLevel};
use crate::store::MemoryStore;
use chrono::Utc;
use uuid::Uuid;

pub struct AuditLog {
    store: MemoryStore,
}

impl AuditLog {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        source: &str,
        agent_name: Option<&str>,
        session_id: Option<Uuid>,
        action: &str,
        target: Option<&str>,
        risk_level: Option<RiskLevel>,
        outcome: Option<&str>,
        detail: serde_json::Value,
    ) -> CoordResult<AuditEntry> {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            source: source.to_string(),
            agent_name: agent_name.map(str::to_string),
            session_id,
            action: action.to_string(),
            target: target.map(str::to_string),
            risk_level,
            outcome: outcome.map(str::to_string),
            detail,
            recorded_at: Utc::now(),
        };
        self.store.insert_audit(entry).await
    }

    pub async fn list(
        &self,
        source: Option<&str>,
        agent_name: Option<&str>,
        session_id: Option<Uuid>,
        limit: usize,
    ) -> Vec<AuditEntry> {
        self.store.list_audit(source, agent_name, session_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_filters_by_source() {
        let log = AuditLog::new(MemoryStore::new());
        log.record("mcp", Some("alice"), None, "tool.called", None, None, None, json!({}))
            .await
            .unwrap();
        log.record("http", Some("bob"), None, "route.hit", None, None, None, json!({}))
            .await
            .unwrap();

        let mcp_only = log.list(Some("mcp"), None, None, 10).await;
        assert_eq!(mcp_only.len(), 1);
        assert_eq!(mcp_only[0].agent_name.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn list_is_most_recent_first_and_respects_limit() {
        let log = AuditLog::new(MemoryStore::new());
        for i in 0..5 {
            log.record("http", None, None, &format!("action-{i}"), None, None, None, json!({}))
                .await
                .unwrap();
        }
        let entries = log.list(None, None, None, 2).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "action-4");
    }

    #[tokio::test]
    async fn records_target_risk_level_and_outcome() {
        let log = AuditLog::new(MemoryStore::new());
        let entry = log
            .record(
                "council",
                Some("conductor"),
                None,
                "drop table",
                Some("production_db"),
                Some(crate::model::RiskLevel::Destructive),
                Some("blocked"),
                json!({}),
            )
            .await
            .unwrap();
        assert_eq!(entry.target.as_deref(), Some("production_db"));
        assert_eq!(entry.risk_level, Some(crate::model::RiskLevel::Destructive));
        assert_eq!(entry.outcome.as_deref(), Some("blocked"));
    }
}
