//! In-memory persistence. The real deployment backs this with Postgres
//! (Supabase); that client and its schema are an external collaborator
//! outside this core's scope (see SPEC_FULL §1), so every entity lives
//! here behind the same method surface a Postgres-backed store would
//! expose. `DashMap` gives each entity table independent interior
//! mutability without a single crate-wide lock, mirroring the teacher's
//! use of `dashmap` for its agent/task maps.

pub mod agents;
pub mod audit;
pub mod conductor_log;
pub mod context;
pub mod council;
pub mod handoffs;
pub mod patterns;
pub mod projects;
pub mod sessions;

use crate::model::*;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) sessions: Arc<DashMap<Uuid, Session>>,
    pub(crate) session_events: Arc<DashMap<Uuid, Vec<SessionEvent>>>,
    pub(crate) messages: Arc<DashMap<Uuid, Vec<ConversationMessage>>>,
    pub(crate) patterns: Arc<DashMap<Uuid, Pattern>>,
    pub(crate) observations: Arc<DashMap<Uuid, Vec<PatternObservation>>>,
    pub(crate) agents: Arc<DashMap<String, Agent>>,
    pub(crate) context: Arc<DashMap<String, SharedContextEntry>>,
    pub(crate) context_history: Arc<DashMap<String, Vec<ContextHistoryEntry>>>,
    pub(crate) handoffs: Arc<DashMap<Uuid, Handoff>>,
    pub(crate) decisions: Arc<DashMap<Uuid, ValidationDecision>>,
    pub(crate) conductor_logs: Arc<DashMap<Uuid, ConductorLogEntry>>,
    pub(crate) audit: Arc<DashMap<Uuid, AuditEntry>>,
    pub(crate) projects: Arc<DashMap<Uuid, Project>>,
    pub(crate) tasks: Arc<DashMap<Uuid, Task>>,
    pub(crate) whiteboard: Arc<Mutex<Whiteboard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn whiteboard(&self) -> Arc<Mutex<Whiteboard>> {
        self.whiteboard.clone()
    }
}
