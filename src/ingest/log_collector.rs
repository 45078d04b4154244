//! Log collector (C2): drains one log source per monitored container,
//! publishing every line to `logs` and any detected event to its topic.

use super::EventDetector;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use swarm_bus::{bus::topics, Bus};
use tracing::{error, info, warn};

/// Abstracts the container runtime's log stream so this module never
/// depends on a Docker client directly - that client is an external
/// collaborator outside this core's scope.
#[async_trait]
pub trait LogSource: Send {
    async fn next_line(&mut self) -> Option<String>;
}

pub struct ContainerLogCollector {
    bus: Bus,
    detector: EventDetector,
}

impl ContainerLogCollector {
    pub fn new(bus: Bus) -> Self {
        Self {
            bus,
            detector: EventDetector::new(),
        }
    }

    /// Drains `source` for `container_name` until it ends, reconnecting via
    /// `reconnect` each time the stream closes. A reconnect failure logs
    /// and stops this container's task without affecting any other
    /// container's collector task.
    pub async fn run<S, F, Fut>(&self, container_name: &str, mut source: S, mut reconnect: F)
    where
        S: LogSource,
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Option<S>>,
    {
        loop {
            match source.next_line().await {
                Some(line) => self.process_line(container_name, &line),
                None => {
                    warn!(container = container_name, "log stream ended, reconnecting");
                    match reconnect().await {
                        Some(new_source) => source = new_source,
                        None => {
                            error!(container = container_name, "failed to reconnect, stopping collector");
                            return;
                        }
                    }
                }
            }
        }
    }

    fn process_line(&self, container_name: &str, line: &str) {
        let timestamp = Utc::now().format("%H:%M:%S").to_string();
        let formatted = format!("[{timestamp}] [{container_name}] {line}");
        self.bus.publish(topics::LOGS, json!({ "line": formatted }));

        if let Some(event) = self.detector.detect(line, container_name) {
            if self.detector.should_publish(&event) {
                let topic = topic_for_entity(&event.entity_type);
                self.bus.publish(
                    topic,
                    json!({
                        "event_type": event.event_type,
                        "entity_type": event.entity_type,
                        "entity_id": event.entity_id,
                        "source": event.source,
                        "timestamp": Utc::now(),
                        "data": event.data,
                    }),
                );
                info!(container = container_name, event_type = %event.event_type, "event detected");
            }
        }
    }
}

fn topic_for_entity(entity_type: &str) -> &'static str {
    match entity_type {
        "task" => topics::TASK,
        "session" => topics::SESSION,
        // Errors and warnings route to events:system, not events:error -
        // events:error is reserved for the higher-level work-order/council
        // error surface, not raw log classification.
        _ => topics::SYSTEM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct FixedLogSource {
        lines: VecDeque<String>,
    }

    #[async_trait]
    impl LogSource for FixedLogSource {
        async fn next_line(&mut self) -> Option<String> {
            self.lines.pop_front()
        }
    }

    #[tokio::test]
    async fn a_task_created_line_publishes_to_the_task_topic() {
        let bus = Bus::new();
        let mut sub = bus.subscribe(topics::TASK);
        let collector = ContainerLogCollector::new(bus.clone());

        let source = FixedLogSource {
            lines: VecDeque::from(vec!["Published task.created event for task abc-123".to_string()]),
        };
        collector
            .run("planner", source, || async { None::<FixedLogSource> })
            .await;

        let env = sub.recv().await.unwrap();
        assert_eq!(env.payload["event_type"], "task.created");
        assert_eq!(env.payload["entity_id"], "abc-123");
    }

    #[tokio::test]
    async fn every_line_is_published_to_logs_even_without_a_detected_event() {
        let bus = Bus::new();
        let mut sub = bus.subscribe(topics::LOGS);
        let collector = ContainerLogCollector::new(bus.clone());

        let source = FixedLogSource {
            lines: VecDeque::from(vec!["nothing special here".to_string()]),
        };
        collector
            .run("worker", source, || async { None::<FixedLogSource> })
            .await;

        let env = sub.recv().await.unwrap();
        assert!(env.payload["line"].as_str().unwrap().contains("nothing special here"));
    }

    #[tokio::test]
    async fn stream_end_triggers_reconnect_and_continues_processing() {
        let bus = Bus::new();
        let mut sub = bus.subscribe(topics::LOGS);
        let collector = ContainerLogCollector::new(bus.clone());

        let first = FixedLogSource { lines: VecDeque::new() };
        let mut reconnected = false;
        collector
            .run("flaky", first, || {
                let done = reconnected;
                reconnected = true;
                async move {
                    if done {
                        None
                    } else {
                        Some(FixedLogSource {
                            lines: VecDeque::from(vec!["back online".to_string()]),
                        })
                    }
                }
            })
            .await;

        let env = sub.recv().await.unwrap();
        assert!(env.payload["line"].as_str().unwrap().contains("back online"));
    }
}
