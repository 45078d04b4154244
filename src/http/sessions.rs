use super::error::ApiResult;
use super::AppState;
use crate::model::MessageRole;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateSessionBody {
    agent_name: String,
    project_id: Option<Uuid>,
}

pub async fn create(State(state): State<AppState>, Json(body): Json<CreateSessionBody>) -> ApiResult<Json<Value>> {
    let session = state
        .sessions
        .create_session(&body.agent_name, body.project_id)
        .await?;
    Ok(Json(json!(session)))
}

#[derive(Deserialize)]
pub struct ListSessionsQuery {
    agent_name: Option<String>,
    project_id: Option<Uuid>,
    limit: Option<usize>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListSessionsQuery>) -> ApiResult<Json<Value>> {
    let sessions = state
        .sessions
        .list_sessions(q.agent_name.as_deref(), q.project_id, None, q.limit)
        .await?;
    Ok(Json(json!(sessions)))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let (session, events) = state.sessions.get_session(id).await?;
    Ok(Json(json!({ "session": session, "events": events })))
}

#[derive(Deserialize)]
pub struct EndSessionBody {
    summary: Option<String>,
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EndSessionBody>,
) -> ApiResult<Json<Value>> {
    let session = state.sessions.end_session(id, body.summary).await?;
    Ok(Json(json!(session)))
}

#[derive(Deserialize)]
pub struct AddEventBody {
    event_type: String,
    data: Value,
}

pub async fn add_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddEventBody>,
) -> ApiResult<Json<Value>> {
    let event = state.sessions.add_event(id, &body.event_type, body.data).await?;
    Ok(Json(json!(event)))
}

#[derive(Deserialize)]
pub struct AddMessageBody {
    role: MessageRole,
    content: String,
    #[serde(default)]
    tools_used: Vec<String>,
    message_type: Option<String>,
    subtype: Option<String>,
    #[serde(default)]
    metadata: Value,
    #[serde(default = "default_true")]
    generate_embedding: bool,
}

fn default_true() -> bool {
    true
}

pub async fn add_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddMessageBody>,
) -> ApiResult<Json<Value>> {
    let message = state
        .sessions
        .add_message(
            id,
            body.role,
            &body.content,
            body.tools_used,
            body.message_type,
            body.subtype,
            body.metadata,
            body.generate_embedding,
        )
        .await?;
    Ok(Json(json!(message)))
}

pub async fn summarize(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let session = state.sessions.update_summary(id).await?;
    Ok(Json(json!(session)))
}

#[derive(Deserialize)]
pub struct SearchBody {
    query: String,
    threshold: Option<f32>,
}

pub async fn search(State(state): State<AppState>, Json(body): Json<SearchBody>) -> ApiResult<Json<Value>> {
    let results = state.sessions.search_sessions(&body.query, body.threshold).await?;
    let shaped: Vec<Value> = results
        .into_iter()
        .map(|r| json!({ "session": r.session, "score": r.score }))
        .collect();
    Ok(Json(json!(shaped)))
}
