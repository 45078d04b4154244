use crate::error::CoordError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    Pending,
    Accepted,
    Completed,
    Rejected,
}

impl HandoffStatus {
    /// Whether `self -> next` is a legal transition. The machine has two
    /// terminal states (`Completed`, `Rejected`); every other edge is the
    /// ordinary pending -> accepted -> completed path, plus a pending ->
    /// rejected shortcut.
    pub fn can_transition_to(self, next: HandoffStatus) -> bool {
        use HandoffStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Accepted, Completed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handoff {
    pub id: Uuid,
    pub session_id: Uuid,
    pub from_agent: String,
    pub to_agent: String,
    pub status: HandoffStatus,
    pub context: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rejected_reason: Option<String>,
}

impl Handoff {
    pub fn new(session_id: Uuid, from_agent: impl Into<String>, to_agent: impl Into<String>, context: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            status: HandoffStatus::Pending,
            context,
            created_at: Utc::now(),
            accepted_at: None,
            completed_at: None,
            rejected_reason: None,
        }
    }

    /// Apply a transition, mutating timestamps as a side effect. Returns a
    /// `Conflict` error - never panics - on an illegal edge, so the caller
    /// can surface it as a 409 without losing the current state.
    pub fn transition(&mut self, next: HandoffStatus) -> Result<(), CoordError> {
        if !self.status.can_transition_to(next) {
            return Err(CoordError::conflict(format!(
                "cannot transition handoff {} from {:?} to {:?}",
                self.id, self.status, next
            )));
        }
        let now = Utc::now();
        match next {
            HandoffStatus::Accepted => self.accepted_at = Some(now),
            HandoffStatus::Completed => self.completed_at = Some(now),
            _ => {}
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_accept_no_further_transitions() {
        assert!(!HandoffStatus::Completed.can_transition_to(HandoffStatus::Accepted));
        assert!(!HandoffStatus::Rejected.can_transition_to(HandoffStatus::Accepted));
    }

    #[test]
    fn pending_can_go_either_accepted_or_rejected_but_not_completed_directly() {
        assert!(HandoffStatus::Pending.can_transition_to(HandoffStatus::Accepted));
        assert!(HandoffStatus::Pending.can_transition_to(HandoffStatus::Rejected));
        assert!(!HandoffStatus::Pending.can_transition_to(HandoffStatus::Completed));
    }
}
