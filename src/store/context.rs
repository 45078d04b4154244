use super::MemoryStore;
use crate::error::CoordResult;
use crate::model::{ContextHistoryEntry, SharedContextEntry};
use chrono::Utc;
use uuid::Uuid;

impl MemoryStore {
    /// Inserts a history row for the previous value (if any) before
    /// overwriting the current row - standing in for the database trigger
    /// the original schema relies on.
    pub async fn set_context(&self, entry: SharedContextEntry) -> CoordResult<SharedContextEntry> {
        let old_value = self.context.get(&entry.context_key).map(|e| e.value.clone());
        self.context_history
            .entry(entry.context_key.clone())
            .or_default()
            .push(ContextHistoryEntry {
                id: Uuid::new_v4(),
                context_key: entry.context_key.clone(),
                old_value,
                new_value: entry.value.clone(),
                changed_by: entry.set_by.clone(),
                changed_at: Utc::now(),
            });
        self.context.insert(entry.context_key.clone(), entry.clone());
        Ok(entry)
    }

    pub async fn get_context(&self, key: &str) -> Option<SharedContextEntry> {
        let entry = self.context.get(key)?.clone();
        if entry.is_expired(Utc::now()) {
            None
        } else {
            Some(entry)
        }
    }

    pub async fn list_context(&self, prefix: Option<&str>) -> Vec<SharedContextEntry> {
        let now = Utc::now();
        let mut entries: Vec<SharedContextEntry> = self
            .context
            .iter()
            .map(|e| e.value().clone())
            .filter(|e| !e.is_expired(now))
            .filter(|e| prefix.map(|p| e.context_key.starts_with(p)).unwrap_or(true))
            .collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        entries
    }

    pub async fn delete_context(&self, key: &str) -> bool {
        self.context.remove(key).is_some()
    }

    /// Most-recent-first, capped to `limit` (default 20).
    pub async fn get_history(&self, key: &str, limit: usize) -> Vec<ContextHistoryEntry> {
        let mut history = self
            .context_history
            .get(key)
            .map(|h| h.value().clone())
            .unwrap_or_default();
        history.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        history.truncate(limit);
        history
    }
}
