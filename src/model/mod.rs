//! The shared data model. Every entity here is a plain serde struct; no
//! type reaches into persistence or transport concerns.

pub mod agent;
pub mod audit;
pub mod conductor_log;
pub mod context;
pub mod council;
pub mod handoff;
pub mod pattern;
pub mod project;
pub mod session;
pub mod whiteboard;

pub use agent::{Agent, AgentStatus};
pub use audit::AuditEntry;
pub use conductor_log::{ConductorLogEntry, DelegationOutcome, DelegationStats, OutcomeSummary};
pub use context::{ContextHistoryEntry, SharedContextEntry};
pub use council::{Decision, RiskLevel, ValidationDecision};
pub use handoff::{Handoff, HandoffStatus};
pub use pattern::{Pattern, PatternObservation, PatternStats, PatternType};
pub use project::{Project, Task, TaskPriority, TaskStatus};
pub use session::{ConversationMessage, MessageRole, Session, SessionEvent};
pub use whiteboard::Whiteboard;
