//! Business-logic services. Each wraps the store (and, where relevant,
//! the embedding gateway, an LLM provider, or the bus) behind the typed
//! operations SPEC_FULL.md names - never a generic `action: String`
//! dispatch.

pub mod agent_registry;
pub mod audit_log;
pub mod auto_archive;
pub mod conductor_log;
pub mod handoff;
pub mod pattern_store;
pub mod plan_promoter;
pub mod session_memory;
pub mod shared_context;
pub mod validation_council;

pub use agent_registry::AgentRegistry;
pub use audit_log::AuditLog;
pub use auto_archive::AutoArchiveLoop;
pub use conductor_log::ConductorLogStore;
pub use handoff::HandoffMachine;
pub use pattern_store::PatternStore;
pub use plan_promoter::PlanPromoter;
pub use session_memory::SessionMemory;
pub use shared_context::SharedContextBoard;
pub use validation_council::ValidationCouncil;

/// Publishes an event envelope the way `event_publisher.py`'s helpers do:
/// `{event_type, entity_type, entity_id, timestamp, agent?, data}`. Never
/// fails the caller - a topic with no subscribers is a normal outcome.
pub fn publish_entity_event(
    bus: &swarm_bus::Bus,
    topic: &str,
    event_type: &str,
    entity_type: &str,
    entity_id: impl std::fmt::Display,
    agent: Option<&str>,
    data: serde_json::Value,
) {
    let mut envelope = serde_json::json!({
        "event_type": event_type,
        "entity_type": entity_type,
        "entity_id": entity_id.to_string(),
        "timestamp": chrono::Utc::now(),
        "data": data,
    });
    if let Some(agent) = agent {
        envelope["agent"] = serde_json::json!(agent);
    }
    bus.publish(topic, envelope);
}

/// Publishes on `events:error`, matching `publish_error_event`'s slightly
/// different envelope shape (`service`/`severity` instead of `agent`).
pub fn publish_error_event(
    bus: &swarm_bus::Bus,
    service: &str,
    severity: &str,
    message: &str,
    additional: serde_json::Value,
) {
    let mut data = serde_json::json!({ "message": message });
    if let (Some(obj), Some(extra)) = (data.as_object_mut(), additional.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    bus.publish(
        swarm_bus::bus::topics::ERROR,
        serde_json::json!({
            "event_type": "error",
            "entity_type": "system",
            "service": service,
            "timestamp": chrono::Utc::now(),
            "severity": severity,
            "data": data,
        }),
    );
}
