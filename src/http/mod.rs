//! HTTP surface: one thin adapter module per feature area. Every handler
//! maps a JSON request straight onto a typed service call - never a
//! generic `action: String` dispatch - and lets `error::ApiError` turn a
//! `CoordError` into the right status code.

pub mod agents;
pub mod audit;
pub mod context;
pub mod council;
pub mod conductor_log;
pub mod error;
pub mod handoffs;
pub mod patterns;
pub mod plans;
pub mod projects;
pub mod sessions;
pub mod stream;
pub mod whiteboard;

use crate::config::Config;
use crate::embeddings::EmbeddingGateway;
use crate::llm::LlmProvider;
use crate::model::Whiteboard;
use crate::services::{
    AgentRegistry, AuditLog, ConductorLogStore, HandoffMachine, PatternStore, PlanPromoter, SessionMemory,
    SharedContextBoard, ValidationCouncil,
};
use crate::store::MemoryStore;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use swarm_bus::Bus;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub bus: Bus,
    pub store: MemoryStore,
    pub sessions: Arc<SessionMemory>,
    pub patterns: Arc<PatternStore>,
    pub agents: Arc<AgentRegistry>,
    pub context: Arc<SharedContextBoard>,
    pub handoffs: Arc<HandoffMachine>,
    pub council: Arc<ValidationCouncil>,
    pub conductor_log: Arc<ConductorLogStore>,
    pub audit: Arc<AuditLog>,
    pub plan_promoter: Arc<PlanPromoter>,
    pub whiteboard: Arc<Mutex<Whiteboard>>,
}

impl AppState {
    pub fn new(
        store: MemoryStore,
        bus: Bus,
        embeddings: Arc<EmbeddingGateway>,
        llm: Arc<dyn LlmProvider>,
        cfg: &Config,
    ) -> Self {
        let whiteboard = store.whiteboard();
        Self {
            sessions: Arc::new(SessionMemory::new(store.clone(), embeddings.clone(), llm.clone(), bus.clone())),
            patterns: Arc::new(PatternStore::new(store.clone(), embeddings, llm.clone())),
            agents: Arc::new(AgentRegistry::new(store.clone())),
            context: Arc::new(SharedContextBoard::new(store.clone())),
            handoffs: Arc::new(HandoffMachine::new(store.clone())),
            council: Arc::new(ValidationCouncil::new(store.clone())),
            conductor_log: Arc::new(ConductorLogStore::new(store.clone())),
            audit: Arc::new(AuditLog::new(store.clone())),
            plan_promoter: Arc::new(PlanPromoter::new(store.clone(), llm, cfg.documents_base_path.clone())),
            whiteboard,
            store,
            bus,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sessions", post(sessions::create).get(sessions::list))
        .route(
            "/sessions/:id",
            get(sessions::get_one).patch(sessions::end_session),
        )
        .route("/sessions/:id/events", post(sessions::add_event))
        .route("/sessions/:id/messages", post(sessions::add_message))
        .route("/sessions/:id/summary", post(sessions::summarize))
        .route("/sessions/search", post(sessions::search))
        .route("/patterns", post(patterns::harvest).get(patterns::search))
        .route("/patterns/:id", get(patterns::get_one))
        .route("/patterns/:id/observations", post(patterns::observe))
        .route("/patterns/stats", get(patterns::stats))
        .route("/agents", post(agents::register).get(agents::list))
        .route("/agents/:name/heartbeat", post(agents::heartbeat))
        .route("/agents/:name/deactivate", post(agents::deactivate))
        .route("/context/:key", get(context::get).put(context::set).delete(context::delete))
        .route("/context", get(context::list))
        .route("/context/:key/history", get(context::history))
        .route("/handoffs", post(handoffs::create).get(handoffs::list))
        .route("/handoffs/pending", get(handoffs::pending))
        .route("/handoffs/:id/accept", post(handoffs::accept))
        .route("/handoffs/:id/complete", post(handoffs::complete))
        .route("/handoffs/:id/reject", post(handoffs::reject))
        .route("/council/evaluate", post(council::evaluate))
        .route("/council/queue", get(council::queue))
        .route("/council/:id/approve", post(council::approve))
        .route("/council/:id/reject", post(council::reject))
        .route("/council/decisions", get(council::decisions))
        .route("/conductor-log", post(conductor_log::log_reasoning))
        .route("/conductor-log/:id/outcome", post(conductor_log::update_outcome))
        .route(
            "/work-orders/:id/reasoning",
            get(conductor_log::work_order_reasoning),
        )
        .route("/audit", post(audit::record).get(audit::list))
        .route("/plans/promote", post(plans::promote))
        .route("/projects", get(projects::list))
        .route("/projects/:id/tasks", get(projects::tasks))
        .route("/whiteboard", get(whiteboard::get))
        .route("/stream/:topic", get(stream::subscribe))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
