use super::error::ApiResult;
use super::AppState;
use crate::model::RiskLevel;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct RecordBody {
    source: String,
    agent_name: Option<String>,
    session_id: Option<Uuid>,
    action: String,
    target: Option<String>,
    risk_level: Option<RiskLevel>,
    outcome: Option<String>,
    detail: Option<Value>,
}

pub async fn record(State(state): State<AppState>, Json(body): Json<RecordBody>) -> ApiResult<Json<Value>> {
    let entry = state
        .audit
        .record(
            &body.source,
            body.agent_name.as_deref(),
            body.session_id,
            &body.action,
            body.target.as_deref(),
            body.risk_level,
            body.outcome.as_deref(),
            body.detail.unwrap_or_else(|| json!({})),
        )
        .await?;
    Ok(Json(json!(entry)))
}

#[derive(Deserialize)]
pub struct ListQuery {
    source: Option<String>,
    agent_name: Option<String>,
    session_id: Option<Uuid>,
    limit: Option<usize>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Value> {
    let entries = state
        .audit
        .list(q.source.as_deref(), q.agent_name.as_deref(), q.session_id, q.limit.unwrap_or(100))
        .await;
    Json(json!(entries))
}
