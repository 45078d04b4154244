use super::error::ApiResult;
use super::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn get(State(state): State<AppState>, Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    state
        .context
        .get(&key)
        .await
        .map(|entry| Json(json!(entry)))
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Deserialize)]
pub struct SetBody {
    value: Value,
    set_by: String,
    session_id: Option<Uuid>,
    expires_at: Option<DateTime<Utc>>,
}

pub async fn set(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<SetBody>,
) -> ApiResult<Json<Value>> {
    let entry = state
        .context
        .set(&key, body.value, &body.set_by, body.session_id, body.expires_at)
        .await?;
    Ok(Json(json!(entry)))
}

pub async fn delete(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    if state.context.delete(&key).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    prefix: Option<String>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Value> {
    Json(json!(state.context.list(q.prefix.as_deref()).await))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

pub async fn history(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> Json<Value> {
    Json(json!(state.context.history(&key, q.limit).await))
}
