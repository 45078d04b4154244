use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{ConversationMessage, Session, SessionEvent};
use chrono::Utc;
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_session(&self, session: Session) -> CoordResult<Session> {
        self.sessions.insert(session.id, session.clone());
        self.session_events.entry(session.id).or_default();
        self.messages.entry(session.id).or_default();
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> CoordResult<Session> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or_else(|| CoordError::not_found(format!("session {id}")))
    }

    pub async fn update_session<F>(&self, id: Uuid, f: F) -> CoordResult<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| CoordError::not_found(format!("session {id}")))?;
        f(&mut entry);
        Ok(entry.clone())
    }

    /// Ordered ascending by `started_at`, most recent first capped to
    /// `limit` (default 20 from the caller), with optional agent/project
    /// filters.
    pub async fn list_sessions(
        &self,
        agent_name: Option<&str>,
        project_id: Option<Uuid>,
        since: Option<chrono::DateTime<Utc>>,
        limit: usize,
    ) -> CoordResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|e| e.value().clone())
            .filter(|s| agent_name.map(|a| s.agent_name == a).unwrap_or(true))
            .filter(|s| project_id.map(|p| s.project_id == Some(p)).unwrap_or(true))
            .filter(|s| since.map(|t| s.started_at >= t).unwrap_or(true))
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit);
        Ok(sessions)
    }

    pub async fn get_active_sessions(&self) -> CoordResult<Vec<Session>> {
        Ok(self
            .sessions
            .iter()
            .map(|e| e.value().clone())
            .filter(|s| s.is_active())
            .collect())
    }

    pub async fn get_last_session(&self, agent_name: &str) -> CoordResult<Option<Session>> {
        Ok(self
            .sessions
            .iter()
            .map(|e| e.value().clone())
            .filter(|s| s.agent_name == agent_name)
            .max_by_key(|s| s.started_at))
    }

    pub async fn count_sessions(&self, agent_name: Option<&str>) -> CoordResult<u64> {
        Ok(self
            .sessions
            .iter()
            .filter(|e| agent_name.map(|a| e.value().agent_name == a).unwrap_or(true))
            .count() as u64)
    }

    pub async fn append_event(&self, event: SessionEvent) -> CoordResult<SessionEvent> {
        if !self.sessions.contains_key(&event.session_id) {
            return Err(CoordError::not_found(format!("session {}", event.session_id)));
        }
        let mut events = self.session_events.entry(event.session_id).or_default();
        events.push(event.clone());
        Ok(event)
    }

    /// Events in the total order they occurred within the session:
    /// ascending `occurred_at`, ties broken by `seq`.
    pub async fn get_events(&self, session_id: Uuid) -> CoordResult<Vec<SessionEvent>> {
        let mut events = self
            .session_events
            .get(&session_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CoordError::not_found(format!("session {session_id}")))?;
        events.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at).then(a.seq.cmp(&b.seq)));
        Ok(events)
    }

    pub async fn next_event_seq(&self, session_id: Uuid) -> u64 {
        self.session_events
            .get(&session_id)
            .map(|e| e.len() as u64)
            .unwrap_or(0)
    }

    pub async fn append_message(&self, message: ConversationMessage) -> CoordResult<ConversationMessage> {
        if !self.sessions.contains_key(&message.session_id) {
            return Err(CoordError::not_found(format!("session {}", message.session_id)));
        }
        self.messages
            .entry(message.session_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    pub async fn get_messages(&self, session_id: Uuid) -> CoordResult<Vec<ConversationMessage>> {
        Ok(self
            .messages
            .get(&session_id)
            .map(|m| m.value().clone())
            .unwrap_or_default())
    }

    pub async fn all_sessions_snapshot(&self) -> Vec<Session> {
        self.sessions.iter().map(|e| e.value().clone()).collect()
    }
}
