use crate::error::CoordResult;
use crate::model::{ContextHistoryEntry, SharedContextEntry};
use crate::store::MemoryStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct SharedContextBoard {
    store: MemoryStore,
}

impl SharedContextBoard {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        set_by: &str,
        session_id: Option<Uuid>,
        expires_at: Option<DateTime<Utc>>,
    ) -> CoordResult<SharedContextEntry> {
        let entry = SharedContextEntry {
            context_key: key.to_string(),
            value,
            set_by: set_by.to_string(),
            session_id,
            updated_at: Utc::now(),
            expires_at,
        };
        self.store.set_context(entry).await
    }

    pub async fn get(&self, key: &str) -> Option<SharedContextEntry> {
        self.store.get_context(key).await
    }

    pub async fn list(&self, prefix: Option<&str>) -> Vec<SharedContextEntry> {
        self.store.list_context(prefix).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.delete_context(key).await
    }

    pub async fn history(&self, key: &str, limit: Option<usize>) -> Vec<ContextHistoryEntry> {
        self.store.get_history(key, limit.unwrap_or(20).clamp(1, 100)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reconstructing_history_reaches_the_current_value() {
        let board = SharedContextBoard::new(MemoryStore::new());
        board.set("deploy.target", serde_json::json!("staging"), "alice", None, None).await.unwrap();
        board.set("deploy.target", serde_json::json!("prod"), "bob", None, None).await.unwrap();

        let current = board.get("deploy.target").await.unwrap();
        assert_eq!(current.value, serde_json::json!("prod"));

        let history = board.history("deploy.target", None).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].new_value, serde_json::json!("prod"));
        assert_eq!(history[0].old_value, Some(serde_json::json!("staging")));
    }

    #[tokio::test]
    async fn expired_entries_are_hidden_from_get_and_list_but_kept_in_history() {
        let board = SharedContextBoard::new(MemoryStore::new());
        let past = Utc::now() - chrono::Duration::seconds(10);
        board.set("ephemeral", serde_json::json!(1), "alice", None, Some(past)).await.unwrap();

        assert!(board.get("ephemeral").await.is_none());
        assert!(board.list(None).await.is_empty());
        assert_eq!(board.history("ephemeral", None).await.len(), 1);
    }

    #[tokio::test]
    async fn set_can_carry_a_session_link() {
        let board = SharedContextBoard::new(MemoryStore::new());
        let session_id = Uuid::new_v4();
        let entry = board
            .set("handoff.note", serde_json::json!("ready"), "alice", Some(session_id), None)
            .await
            .unwrap();
        assert_eq!(entry.session_id, Some(session_id));
    }

    #[tokio::test]
    async fn history_limit_is_clamped_into_one_hundred() {
        let board = SharedContextBoard::new(MemoryStore::new());
        for i in 0..5 {
            board
                .set("counter", serde_json::json!(i), "alice", None, None)
                .await
                .unwrap();
        }
        assert_eq!(board.history("counter", Some(1000)).await.len(), 5);
        assert_eq!(board.history("counter", Some(0)).await.len(), 1);
    }
}
