//! Server-Sent Events fan-out for the event bus (C6). A subscriber sees
//! every envelope published to its topic from the moment it connects
//! onward; nothing is replayed from before the subscription.

use super::AppState;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use swarm_bus::Subscription;

async fn next_event(mut sub: Subscription) -> Option<(Result<Event, Infallible>, Subscription)> {
    match sub.recv().await {
        Ok(envelope) => {
            let payload = serde_json::to_string(&envelope).unwrap_or_default();
            let event = Event::default().event(envelope.topic.clone()).data(payload);
            Some((Ok(event), sub))
        }
        Err(_closed) => None,
    }
}

pub async fn subscribe(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.bus.subscribe(&topic);
    let events = stream::unfold(subscription, next_event);
    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
