use super::error::ApiResult;
use super::AppState;
use crate::model::AgentStatus;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct RegisterBody {
    name: String,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    metadata: Value,
}

pub async fn register(State(state): State<AppState>, Json(body): Json<RegisterBody>) -> ApiResult<Json<Value>> {
    let agent = state.agents.register(&body.name, body.capabilities, body.metadata).await?;
    Ok(Json(json!(agent)))
}

#[derive(Deserialize)]
pub struct ListAgentsQuery {
    status: Option<AgentStatus>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListAgentsQuery>) -> Json<Value> {
    Json(json!(state.agents.list(q.status).await))
}

pub async fn heartbeat(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Json<Value>> {
    let agent = state.agents.heartbeat(&name).await?;
    Ok(Json(json!(agent)))
}

pub async fn deactivate(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Json<Value>> {
    let agent = state.agents.deactivate(&name).await?;
    Ok(Json(json!(agent)))
}
