//! Pure, synchronous log-line classifier. No I/O, no async - a log line
//! and a service name go in, an optional structured event comes out.

use regex::Regex;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct DetectedEvent {
    pub event_type: String,
    pub entity_type: String,
    /// Duplicated from whichever of `task_id`/`session_id`/`service_name`
    /// the pattern extracted, in that priority order.
    pub entity_id: Option<String>,
    pub source: String,
    pub data: serde_json::Value,
}

struct PatternRule {
    event_type: &'static str,
    regex: Regex,
}

pub struct EventDetector {
    rules: Vec<PatternRule>,
}

impl EventDetector {
    pub fn new() -> Self {
        let specs: &[(&str, &str)] = &[
            ("task.created", r"Published task\.created event for task (?P<task_id>[\w-]+)"),
            (
                "task.status_changed",
                r"Published task\.status_changed event for task (?P<task_id>[\w-]+)",
            ),
            ("task.assigned", r"Published task\.assigned event for task (?P<task_id>[\w-]+)"),
            (
                "session.started",
                r"Published session\.started event for session (?P<session_id>[\w-]+)",
            ),
            (
                "session.ended",
                r"Published session\.ended event for session (?P<session_id>[\w-]+)",
            ),
            ("whiteboard.task_added", r"Added task (?P<task_id>[\w-]+) to whiteboard"),
            (
                "whiteboard.task_updated",
                r"Updated task (?P<task_id>[\w-]+) on whiteboard: (?P<old_status>\w+) \u{2192} (?P<new_status>\w+)",
            ),
            (
                "whiteboard.session_added",
                r"Added session (?P<session_id>[\w-]+) \((?P<agent>\w+)\) to whiteboard",
            ),
            (
                "whiteboard.session_removed",
                r"Removed session (?P<session_id>[\w-]+) from whiteboard",
            ),
            ("service.started", r"(?P<service_name>[\w-]+) service started successfully"),
            ("service.stopped", r"(?P<service_name>[\w-]+) service stopped"),
            ("backend.started", r"Archon backend started successfully!"),
            ("backend.shutdown", r"Shutting down Archon backend"),
            ("error.occurred", r"(?i)ERROR.*?:\s*(?P<error_message>.+)$"),
            ("warning.occurred", r"(?i)WARNING.*?:\s*(?P<warning_message>.+)$"),
            ("crawl.started", r"Starting crawl for URL: (?P<url>.+)"),
            ("crawl.completed", r"Crawl completed for (?P<url>.+)"),
            ("api.request", r"(?P<method>GET|POST|PUT|DELETE|PATCH)\s+(?P<path>/api/[\w/]+)"),
            (
                "task.completed",
                r"(?i)(?:Task|Todo|Item)\s+(?:completed|done|finished):\s*(?P<description>.+)$",
            ),
            (
                "task.started",
                r"(?i)(?:Started|Beginning|Working on)\s+(?:task|todo):\s*(?P<description>.+)$",
            ),
            (
                "task.added",
                r"(?i)(?:Added|Created)\s+(?:task|todo):\s*(?P<description>.+)$",
            ),
            ("task.list_updated", r"Todos have been modified successfully"),
        ];

        let rules = specs
            .iter()
            .map(|(event_type, pattern)| PatternRule {
                event_type,
                regex: Regex::new(pattern).expect("static pattern table must compile"),
            })
            .collect();

        Self { rules }
    }

    /// First-match-wins over the ordered pattern table.
    pub fn detect(&self, log_line: &str, service_name: &str) -> Option<DetectedEvent> {
        for rule in &self.rules {
            if let Some(caps) = rule.regex.captures(log_line) {
                let mut data = json!({ "log_line": log_line.trim() });
                let mut entity_id = None;
                if let Some(obj) = data.as_object_mut() {
                    for name in rule.regex.capture_names().flatten() {
                        if let Some(m) = caps.name(name) {
                            obj.insert(name.to_string(), json!(m.as_str().trim()));
                        }
                    }
                    entity_id = obj
                        .get("task_id")
                        .or_else(|| obj.get("session_id"))
                        .or_else(|| obj.get("service_name"))
                        .and_then(|v| v.as_str())
                        .map(str::to_string);
                }
                return Some(DetectedEvent {
                    event_type: rule.event_type.to_string(),
                    entity_type: entity_type_for(rule.event_type),
                    entity_id,
                    source: service_name.to_string(),
                    data,
                });
            }
        }
        None
    }

    /// Filters noise before it is fanned out on the event topics: API
    /// request chatter is always dropped; warnings are dropped unless they
    /// look actionable.
    pub fn should_publish(&self, event: &DetectedEvent) -> bool {
        if event.event_type == "api.request" {
            return false;
        }
        if event.event_type == "warning.occurred" {
            let message = event.data["warning_message"].as_str().unwrap_or("");
            return message.contains("Could not start") || message.contains("Failed to");
        }
        true
    }
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn entity_type_for(event_type: &str) -> String {
    event_type
        .split('.')
        .next()
        .unwrap_or("system")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_example_task_created_line_is_detected() {
        let detector = EventDetector::new();
        let event = detector
            .detect("Published task.created event for task abc-123", "archon-server")
            .unwrap();
        assert_eq!(event.event_type, "task.created");
        assert_eq!(event.entity_type, "task");
        assert_eq!(event.entity_id.as_deref(), Some("abc-123"));
        assert_eq!(event.data["task_id"], "abc-123");
        assert_eq!(event.source, "archon-server");
    }

    #[test]
    fn api_request_is_never_published() {
        let detector = EventDetector::new();
        let event = detector.detect("GET /api/health", "server").unwrap();
        assert_eq!(event.event_type, "api.request");
        assert!(!detector.should_publish(&event));
    }

    #[test]
    fn plain_warning_is_suppressed_but_actionable_one_is_not() {
        let detector = EventDetector::new();
        let quiet = detector.detect("WARNING: cache miss", "server").unwrap();
        assert!(!detector.should_publish(&quiet));

        let loud = detector.detect("WARNING: Could not start worker", "server").unwrap();
        assert!(detector.should_publish(&loud));
    }

    #[test]
    fn first_match_wins_when_patterns_could_overlap() {
        let detector = EventDetector::new();
        let event = detector
            .detect("Published task.created event for task T1", "planner")
            .unwrap();
        assert_eq!(event.event_type, "task.created");
        assert_eq!(event.data["task_id"], "T1");
    }

    #[test]
    fn unmatched_line_yields_nothing() {
        let detector = EventDetector::new();
        assert!(detector.detect("just some ordinary log output", "server").is_none());
    }

    #[test]
    fn entity_type_is_the_event_type_prefix() {
        let detector = EventDetector::new();
        let event = detector
            .detect("Published session.started event for session s-1", "server")
            .unwrap();
        assert_eq!(event.entity_type, "session");
        assert_eq!(event.entity_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn todo_chatter_maps_onto_the_task_event_family() {
        let detector = EventDetector::new();
        let event = detector.detect("Task completed: ship it", "worker").unwrap();
        assert_eq!(event.event_type, "task.completed");
        assert_eq!(event.entity_type, "task");
        assert_eq!(event.data["description"], "ship it");
    }

    #[test]
    fn service_name_becomes_entity_id_when_no_task_or_session_present() {
        let detector = EventDetector::new();
        let event = detector.detect("archon-mcp service started successfully", "archon-mcp").unwrap();
        assert_eq!(event.event_type, "service.started");
        assert_eq!(event.entity_id.as_deref(), Some("archon-mcp"));
    }
}
