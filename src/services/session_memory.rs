//! Session memory (C8): create/end sessions, append structured events and
//! conversation messages, summarize via the LLM provider, and search by
//! embedding similarity.

use crate::embeddings::{cosine_similarity, EmbeddingGateway};
use crate::error::CoordResult;
use crate::llm::LlmProvider;
use crate::model::{ConversationMessage, MessageRole, Session, SessionEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use swarm_bus::{bus::topics, Bus};
use uuid::Uuid;

use crate::store::MemoryStore;

pub struct SessionMemory {
    store: MemoryStore,
    embeddings: Arc<EmbeddingGateway>,
    llm: Arc<dyn LlmProvider>,
    bus: Bus,
}

#[derive(Debug, Clone)]
pub struct ScoredSession {
    pub session: Session,
    pub score: f32,
}

impl SessionMemory {
    pub fn new(
        store: MemoryStore,
        embeddings: Arc<EmbeddingGateway>,
        llm: Arc<dyn LlmProvider>,
        bus: Bus,
    ) -> Self {
        Self {
            store,
            embeddings,
            llm,
            bus,
        }
    }

    pub async fn create_session(
        &self,
        agent_name: &str,
        project_id: Option<Uuid>,
    ) -> CoordResult<Session> {
        let session = Session::new(agent_name, project_id);
        let session = self.store.insert_session(session).await?;
        crate::services::publish_entity_event(
            &self.bus,
            topics::SESSION,
            "session.started",
            "session",
            session.id,
            Some(agent_name),
            serde_json::json!({}),
        );
        Ok(session)
    }

    /// Ends the session, embedding the summary if one is supplied (a
    /// missing summary is not an error - the embedding is simply absent,
    /// i.e. Degraded rather than failed).
    pub async fn end_session(&self, id: Uuid, summary: Option<String>) -> CoordResult<Session> {
        let embedding = match &summary {
            Some(text) => self.embeddings.embed(text).await,
            None => None,
        };
        let session = self
            .store
            .update_session(id, |s| {
                s.ended_at = Some(Utc::now());
                if let Some(text) = summary {
                    s.summary = Some(text);
                }
                s.embedding = embedding;
            })
            .await?;
        crate::services::publish_entity_event(
            &self.bus,
            topics::SESSION,
            "session.ended",
            "session",
            session.id,
            Some(&session.agent_name),
            serde_json::json!({}),
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> CoordResult<(Session, Vec<SessionEvent>)> {
        let session = self.store.get_session(id).await?;
        let events = self.store.get_events(id).await?;
        Ok((session, events))
    }

    pub async fn list_sessions(
        &self,
        agent_name: Option<&str>,
        project_id: Option<Uuid>,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> CoordResult<Vec<Session>> {
        self.store
            .list_sessions(agent_name, project_id, since, limit.unwrap_or(20))
            .await
    }

    pub async fn get_active_sessions(&self) -> CoordResult<Vec<Session>> {
        self.store.get_active_sessions().await
    }

    pub async fn get_last_session(&self, agent_name: &str) -> CoordResult<Option<Session>> {
        self.store.get_last_session(agent_name).await
    }

    pub async fn count_sessions(&self, agent_name: Option<&str>) -> CoordResult<u64> {
        self.store.count_sessions(agent_name).await
    }

    pub async fn get_recent_sessions(&self, limit: usize) -> CoordResult<Vec<Session>> {
        self.store.list_sessions(None, None, None, limit).await
    }

    /// Appends a structured event, embedding it as
    /// `"<event_type>. <k: v ...>"`. Embedding failure is recorded as a
    /// `None` embedding on the stored event, never as a write failure -
    /// the event itself is never lost over an embedding hiccup.
    pub async fn add_event(
        &self,
        session_id: Uuid,
        event_type: &str,
        data: serde_json::Value,
    ) -> CoordResult<SessionEvent> {
        let text = event_embedding_text(event_type, &data);
        let embedding = self.embeddings.embed(&text).await;
        let seq = self.store.next_event_seq(session_id).await;
        let event = SessionEvent {
            id: Uuid::new_v4(),
            session_id,
            seq,
            event_type: event_type.to_string(),
            occurred_at: Utc::now(),
            data,
            embedding,
        };
        self.store.append_event(event).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn add_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
        tools_used: Vec<String>,
        message_type: Option<String>,
        subtype: Option<String>,
        metadata: serde_json::Value,
        generate_embedding: bool,
    ) -> CoordResult<ConversationMessage> {
        let embedding = if generate_embedding {
            let text = match &message_type {
                Some(t) => format!("[{t}] {role:?}: {content}"),
                None => format!("{role:?}: {content}"),
            };
            self.embeddings.embed(&text).await
        } else {
            None
        };
        let message = ConversationMessage {
            id: Uuid::new_v4(),
            session_id,
            role,
            content: content.to_string(),
            tools_used,
            message_type,
            subtype,
            metadata,
            created_at: Utc::now(),
            embedding,
        };
        self.store.append_message(message).await
    }

    /// Summarizes every message/event in the session through the LLM
    /// provider, then persists and re-embeds the resulting summary.
    pub async fn update_summary(&self, id: Uuid) -> CoordResult<Session> {
        let session = self.store.get_session(id).await?;
        let messages = self.store.get_messages(id).await?;
        let transcript = messages
            .iter()
            .map(|m| format!("[{:?}] {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let summary = self.llm.summarize_session(&session.agent_name, &transcript).await?;
        let embedding_text = format!(
            "{} {} {} {}",
            summary.summary,
            summary.key_events.join(" "),
            summary.decisions_made.join(" "),
            summary.outcomes.join(" ")
        );
        let embedding = self.embeddings.embed(&embedding_text).await;

        self.store
            .update_session(id, |s| {
                s.summary = Some(summary.summary.clone());
                s.key_events = summary.key_events.clone();
                s.decisions_made = summary.decisions_made.clone();
                s.outcomes = summary.outcomes.clone();
                s.next_steps = summary.next_steps.clone();
                s.embedding = embedding;
            })
            .await
    }

    /// Embeds `query`, then ranks every session with an embedding by
    /// cosine similarity, keeping results at or above `threshold`
    /// (default 0.7). A blank query or an offline embedding provider
    /// yields `[]`, not an error - this is a read path, and a degraded
    /// dependency should degrade the result, not fail the request.
    pub async fn search_sessions(&self, query: &str, threshold: Option<f32>) -> CoordResult<Vec<ScoredSession>> {
        let threshold = threshold.unwrap_or(0.7);
        let query_embedding = match self.embeddings.embed(query).await {
            Some(v) => v,
            None => return Ok(Vec::new()),
        };

        let mut scored: Vec<ScoredSession> = self
            .store
            .all_sessions_snapshot()
            .await
            .into_iter()
            .filter_map(|session| {
                let embedding = session.embedding.clone()?;
                let score = cosine_similarity(&query_embedding, &embedding);
                (score >= threshold).then_some(ScoredSession { session, score })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored)
    }
}

fn event_embedding_text(event_type: &str, data: &serde_json::Value) -> String {
    let fields = data
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| format!("{k}: {}", value_as_plain_text(v)))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    format!("{event_type}. {fields}")
}

fn value_as_plain_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::DeterministicEmbeddingProvider;
    use crate::llm::DeterministicLlmProvider;

    fn harness() -> SessionMemory {
        SessionMemory::new(
            MemoryStore::new(),
            Arc::new(EmbeddingGateway::new(Arc::new(DeterministicEmbeddingProvider))),
            Arc::new(DeterministicLlmProvider),
            Bus::new(),
        )
    }

    #[tokio::test]
    async fn ending_a_session_without_a_summary_leaves_embedding_none() {
        let memory = harness();
        let session = memory.create_session("alice", None).await.unwrap();
        let ended = memory.end_session(session.id, None).await.unwrap();
        assert!(ended.ended_at.is_some());
        assert!(ended.embedding.is_none());
    }

    #[tokio::test]
    async fn ending_with_a_summary_embeds_it() {
        let memory = harness();
        let session = memory.create_session("alice", None).await.unwrap();
        let ended = memory
            .end_session(session.id, Some("did good work".to_string()))
            .await
            .unwrap();
        assert!(ended.embedding.is_some());
    }

    #[tokio::test]
    async fn events_are_returned_in_total_order() {
        let memory = harness();
        let session = memory.create_session("alice", None).await.unwrap();
        memory
            .add_event(session.id, "step.one", serde_json::json!({}))
            .await
            .unwrap();
        memory
            .add_event(session.id, "step.two", serde_json::json!({}))
            .await
            .unwrap();
        let (_, events) = memory.get_session(session.id).await.unwrap();
        assert_eq!(events[0].event_type, "step.one");
        assert_eq!(events[1].event_type, "step.two");
    }

    #[tokio::test]
    async fn blank_query_returns_empty_results_not_an_error() {
        let memory = harness();
        assert!(memory.search_sessions("   ", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_message_carries_tools_and_taxonomy() {
        let memory = harness();
        let session = memory.create_session("alice", None).await.unwrap();
        let message = memory
            .add_message(
                session.id,
                MessageRole::Assistant,
                "I'll create the migration file.",
                vec!["database".to_string(), "migration".to_string()],
                Some("response".to_string()),
                Some("acknowledgment".to_string()),
                serde_json::json!({}),
                true,
            )
            .await
            .unwrap();
        assert_eq!(message.tools_used, vec!["database".to_string(), "migration".to_string()]);
        assert_eq!(message.subtype.as_deref(), Some("acknowledgment"));
        assert!(message.embedding.is_some());
    }

    #[tokio::test]
    async fn add_message_without_embedding_request_skips_embedding() {
        let memory = harness();
        let session = memory.create_session("alice", None).await.unwrap();
        let message = memory
            .add_message(
                session.id,
                MessageRole::User,
                "hello",
                Vec::new(),
                None,
                None,
                serde_json::json!({}),
                false,
            )
            .await
            .unwrap();
        assert!(message.embedding.is_none());
    }
}
