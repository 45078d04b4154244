use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of entries kept in `recent_events`; the oldest is
/// dropped on every append once the ring is full.
pub const MAX_RECENT_EVENTS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    pub session_id: String,
    /// Not every producer of `session.started` knows the agent name; the
    /// detector only ever extracts a session ID from that log line.
    pub agent_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTask {
    pub task_id: String,
    pub status: String,
    pub assignee: Option<String>,
}

/// A reduced, live-updated view of active sessions/tasks and the most
/// recent events the listener has processed. There is exactly one
/// writer (the event listener); everyone else reads a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Whiteboard {
    pub active_sessions: Vec<ActiveSession>,
    pub active_tasks: Vec<ActiveTask>,
    pub recent_events: VecDeque<serde_json::Value>,
}

impl Whiteboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, session: ActiveSession) {
        self.active_sessions
            .retain(|s| s.session_id != session.session_id);
        self.active_sessions.push(session);
    }

    pub fn remove_session(&mut self, session_id: &str) {
        self.active_sessions
            .retain(|s| s.session_id != session_id);
    }

    /// Mirrors `whiteboard_service.update_task_status`: the task is
    /// dropped from the active list unconditionally, then re-added only
    /// if the new status is `"doing"`.
    pub fn update_task_status(&mut self, task_id: &str, status: &str, assignee: Option<String>) {
        self.active_tasks.retain(|t| t.task_id != task_id);
        if status == "doing" {
            self.active_tasks.push(ActiveTask {
                task_id: task_id.to_string(),
                status: status.to_string(),
                assignee,
            });
        }
    }

    /// Every processed event is appended here regardless of whether it
    /// also touched the active lists above. Most-recent-first; truncated
    /// to `MAX_RECENT_EVENTS`.
    pub fn add_event(&mut self, event: serde_json::Value) {
        self.recent_events.push_front(event);
        self.recent_events.truncate(MAX_RECENT_EVENTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_session_dedupes_by_id() {
        let mut wb = Whiteboard::new();
        wb.add_session(ActiveSession {
            session_id: "s1".into(),
            agent_name: Some("alice".into()),
        });
        wb.add_session(ActiveSession {
            session_id: "s1".into(),
            agent_name: Some("alice-renamed".into()),
        });
        assert_eq!(wb.active_sessions.len(), 1);
        assert_eq!(wb.active_sessions[0].agent_name.as_deref(), Some("alice-renamed"));
    }

    #[test]
    fn update_task_status_only_keeps_doing_tasks_active() {
        let mut wb = Whiteboard::new();
        wb.update_task_status("t1", "doing", Some("bob".into()));
        assert_eq!(wb.active_tasks.len(), 1);
        wb.update_task_status("t1", "done", None);
        assert!(wb.active_tasks.is_empty());
    }

    #[test]
    fn recent_events_ring_buffer_caps_and_is_most_recent_first() {
        let mut wb = Whiteboard::new();
        for i in 0..(MAX_RECENT_EVENTS + 10) {
            wb.add_event(json!({ "i": i }));
        }
        assert_eq!(wb.recent_events.len(), MAX_RECENT_EVENTS);
        assert_eq!(wb.recent_events[0]["i"], MAX_RECENT_EVENTS + 9);
    }
}
