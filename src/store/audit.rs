use super::MemoryStore;
use crate::error::CoordResult;
use crate::model::AuditEntry;
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_audit(&self, entry: AuditEntry) -> CoordResult<AuditEntry> {
        self.audit.insert(entry.id, entry.clone());
        Ok(entry)
    }

    pub async fn list_audit(
        &self,
        source: Option<&str>,
        agent_name: Option<&str>,
        session_id: Option<Uuid>,
        limit: usize,
    ) -> Vec<AuditEntry> {
        let mut entries: Vec<AuditEntry> = self
            .audit
            .iter()
            .map(|e| e.value().clone())
            .filter(|e| source.map(|s| e.source == s).unwrap_or(true))
            .filter(|e| agent_name.map(|a| e.agent_name.as_deref() == Some(a)).unwrap_or(true))
            .filter(|e| session_id.map(|s| e.session_id == Some(s)).unwrap_or(true))
            .collect();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        entries.truncate(limit);
        entries
    }
}
