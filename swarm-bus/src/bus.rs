//! In-process pub/sub backplane.
//!
//! Topics are addressed by name (mirroring Redis channel names in the
//! deployment this replaces: `events:task`, `events:session`, `logs`, ...).
//! Publish is non-blocking and never fails the caller; a topic with no
//! subscribers simply drops the message. Slow subscribers fall behind and
//! lose the oldest buffered messages rather than blocking publishers -
//! this is "best-effort fanout" read onto `tokio::broadcast`.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default per-topic channel capacity before the slowest subscriber starts
/// dropping messages.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Well-known topic names, matching the channel names the original
/// deployment publishes to over Redis.
pub mod topics {
    pub const TASK: &str = "events:task";
    pub const SESSION: &str = "events:session";
    pub const SYSTEM: &str = "events:system";
    pub const ERROR: &str = "events:error";
    pub const WORK_ORDER: &str = "events:work_order";
    pub const LOGS: &str = "logs";
    pub const CLAUDE_SESSIONS: &str = "claude-sessions";
}

/// An envelope published on the bus. `payload` carries the JSON shape the
/// HTTP/SSE layer forwards verbatim to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub topic: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("subscriber lagged, {0} messages dropped")]
    Lagged(u64),
    #[error("topic closed")]
    Closed,
}

/// A cancellable subscription to a single topic.
pub struct Subscription {
    topic: String,
    rx: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Await the next message. Returns `Ok(None)` only when every sender for
    /// this topic has been dropped (i.e. the bus itself is gone).
    pub async fn recv(&mut self) -> Result<Envelope, BusError> {
        loop {
            match self.rx.recv().await {
                Ok(env) => return Ok(env),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(topic = %self.topic, dropped = n, "subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return Err(BusError::Closed),
            }
        }
    }
}

/// The shared pub/sub fabric. Cheaply cloneable (internally an `Arc`-free
/// `DashMap` of broadcast senders); share one instance across the process.
#[derive(Clone, Default)]
pub struct Bus {
    channels: std::sync::Arc<DashMap<String, broadcast::Sender<Envelope>>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<Envelope> {
        self.channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(DEFAULT_CAPACITY).0)
            .clone()
    }

    /// Publish `payload` on `topic`. Returns the number of subscribers that
    /// were listening at publish time; never errors.
    pub fn publish(&self, topic: &str, payload: serde_json::Value) -> usize {
        let sender = self.sender_for(topic);
        let envelope = Envelope {
            topic: topic.to_string(),
            payload,
        };
        match sender.send(envelope) {
            Ok(n) => {
                debug!(topic, subscribers = n, "published");
                n
            }
            Err(_) => {
                debug!(topic, subscribers = 0, "published with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self, topic: &str) -> Subscription {
        let sender = self.sender_for(topic);
        Subscription {
            topic: topic.to_string(),
            rx: sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.channels
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_with_no_subscribers_does_not_panic() {
        let bus = Bus::new();
        let n = bus.publish(topics::TASK, json!({"event_type": "task.created"}));
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_published_envelope() {
        let bus = Bus::new();
        let mut sub = bus.subscribe(topics::SESSION);
        let n = bus.publish(topics::SESSION, json!({"event_type": "session.started"}));
        assert_eq!(n, 1);
        let env = sub.recv().await.unwrap();
        assert_eq!(env.topic, topics::SESSION);
        assert_eq!(env.payload["event_type"], "session.started");
    }

    #[tokio::test]
    async fn independent_topics_do_not_cross_deliver() {
        let bus = Bus::new();
        let mut task_sub = bus.subscribe(topics::TASK);
        bus.publish(topics::SESSION, json!({"event_type": "session.started"}));
        // No message on the task topic; publishing on another topic must
        // not wake this subscription.
        let res = tokio::time::timeout(std::time::Duration::from_millis(20), task_sub.recv()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_dropped_messages_instead_of_erroring() {
        let bus = Bus::new();
        let mut sub = bus.subscribe(topics::LOGS);
        for i in 0..(DEFAULT_CAPACITY + 5) {
            bus.publish(topics::LOGS, json!({"i": i}));
        }
        // Should still be able to receive *something* rather than hang or
        // bubble a fatal error; Lagged is swallowed internally by recv().
        let env = sub.recv().await.unwrap();
        assert!(env.payload["i"].as_u64().is_some());
    }
}
