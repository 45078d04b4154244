use super::error::ApiResult;
use super::AppState;
use crate::model::HandoffStatus;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateBody {
    session_id: Uuid,
    from_agent: String,
    to_agent: String,
    context: Option<Value>,
}

pub async fn create(State(state): State<AppState>, Json(body): Json<CreateBody>) -> ApiResult<Json<Value>> {
    let handoff = state
        .handoffs
        .create(body.session_id, &body.from_agent, &body.to_agent, body.context.unwrap_or_else(|| json!({})))
        .await?;
    Ok(Json(json!(handoff)))
}

#[derive(Deserialize)]
pub struct ListQuery {
    session_id: Option<Uuid>,
    agent: Option<String>,
    status: Option<HandoffStatus>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Value> {
    let handoffs = state.handoffs.list(q.session_id, q.agent.as_deref(), q.status).await;
    Json(json!(handoffs))
}

#[derive(Deserialize)]
pub struct PendingQuery {
    to_agent: Option<String>,
}

pub async fn pending(State(state): State<AppState>, Query(q): Query<PendingQuery>) -> Json<Value> {
    Json(json!(state.handoffs.pending_for(q.to_agent.as_deref()).await))
}

pub async fn accept(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    Ok(Json(json!(state.handoffs.accept(id).await?)))
}

pub async fn complete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    Ok(Json(json!(state.handoffs.complete(id).await?)))
}

#[derive(Deserialize)]
pub struct RejectBody {
    reason: Option<String>,
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> ApiResult<Json<Value>> {
    Ok(Json(json!(state.handoffs.reject(id, body.reason).await?)))
}
