//! Event listener (C4): the single writer of the live whiteboard (C5). It
//! subscribes to `events:task` and `events:session`, reduces each event
//! into the whiteboard's active lists, and unconditionally appends every
//! processed event to the recent-events ring - regardless of whether it
//! also touched an active list.

use crate::model::whiteboard::ActiveSession;
use crate::model::Whiteboard;
use std::sync::Arc;
use swarm_bus::{bus::topics, Bus};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

pub struct EventListener {
    bus: Bus,
    whiteboard: Arc<Mutex<Whiteboard>>,
}

impl EventListener {
    pub fn new(bus: Bus, whiteboard: Arc<Mutex<Whiteboard>>) -> Self {
        Self { bus, whiteboard }
    }

    /// Runs until `token` is cancelled. A reducer failure for one event is
    /// logged and the loop continues - one bad event must never stop the
    /// listener from processing the rest of the stream.
    pub async fn run(&self, token: CancellationToken) {
        let mut task_sub = self.bus.subscribe(topics::TASK);
        let mut session_sub = self.bus.subscribe(topics::SESSION);

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                msg = task_sub.recv() => {
                    match msg {
                        Ok(env) => self.handle(env.payload).await,
                        Err(e) => { warn!(error = %e, "task subscription error"); }
                    }
                }
                msg = session_sub.recv() => {
                    match msg {
                        Ok(env) => self.handle(env.payload).await,
                        Err(e) => { warn!(error = %e, "session subscription error"); }
                    }
                }
            }
        }
    }

    async fn handle(&self, event: serde_json::Value) {
        if let Err(e) = self.reduce(&event).await {
            error!(error = %e, event = %event, "failed to reduce event onto whiteboard");
        }
    }

    async fn reduce(&self, event: &serde_json::Value) -> anyhow::Result<()> {
        let event_type = event["event_type"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("event missing event_type"))?;

        let mut wb = self.whiteboard.lock().await;

        match event_type {
            "task.created" => {
                let status = event["data"]["status"].as_str().unwrap_or("todo");
                if status == "doing" {
                    let task_id = event["entity_id"].as_str().unwrap_or_default().to_string();
                    wb.update_task_status(&task_id, status, None);
                }
            }
            "task.status_changed" => {
                let task_id = event["entity_id"].as_str().unwrap_or_default().to_string();
                let status = event["data"]["status"].as_str().unwrap_or("todo");
                let assignee = event["data"]["assignee"].as_str().map(str::to_string);
                wb.update_task_status(&task_id, status, assignee);
            }
            "task.assigned" => {
                let status = event["data"]["status"].as_str().unwrap_or("");
                if status == "doing" {
                    let task_id = event["entity_id"].as_str().unwrap_or_default().to_string();
                    let assignee = event["data"]["new_assignee"]
                        .as_str()
                        .or_else(|| event["agent"].as_str())
                        .map(str::to_string);
                    wb.update_task_status(&task_id, status, assignee);
                }
            }
            "session.started" => {
                wb.add_session(ActiveSession {
                    session_id: event["entity_id"].as_str().unwrap_or_default().to_string(),
                    agent_name: event["agent"].as_str().map(str::to_string),
                });
            }
            "session.ended" => {
                wb.remove_session(event["entity_id"].as_str().unwrap_or_default());
            }
            _ => {}
        }

        wb.add_event(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn every_processed_event_lands_in_recent_events() {
        let bus = Bus::new();
        let wb = Arc::new(Mutex::new(Whiteboard::new()));
        let listener = EventListener::new(bus, wb.clone());

        listener
            .reduce(&json!({"event_type": "task.created", "entity_id": "t1", "data": {"status": "todo"}}))
            .await
            .unwrap();

        let board = wb.lock().await;
        assert_eq!(board.recent_events.len(), 1);
        assert!(board.active_tasks.is_empty());
    }

    #[tokio::test]
    async fn session_started_then_ended_round_trips_the_active_list() {
        let bus = Bus::new();
        let wb = Arc::new(Mutex::new(Whiteboard::new()));
        let listener = EventListener::new(bus, wb.clone());

        listener
            .reduce(&json!({"event_type": "session.started", "entity_id": "s1", "agent": "alice"}))
            .await
            .unwrap();
        assert_eq!(wb.lock().await.active_sessions.len(), 1);

        listener
            .reduce(&json!({"event_type": "session.ended", "entity_id": "s1"}))
            .await
            .unwrap();
        assert!(wb.lock().await.active_sessions.is_empty());
    }

    #[tokio::test]
    async fn status_changed_to_doing_adds_task_with_assignee() {
        let bus = Bus::new();
        let wb = Arc::new(Mutex::new(Whiteboard::new()));
        let listener = EventListener::new(bus, wb.clone());

        listener
            .reduce(&json!({
                "event_type": "task.status_changed",
                "entity_id": "t1",
                "data": {"status": "doing", "assignee": "bob"}
            }))
            .await
            .unwrap();

        let board = wb.lock().await;
        assert_eq!(board.active_tasks.len(), 1);
        assert_eq!(board.active_tasks[0].assignee.as_deref(), Some("bob"));
    }
}
