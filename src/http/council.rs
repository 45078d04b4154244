use super::error::ApiResult;
use super::AppState;
use crate::model::{Decision, RiskLevel};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct EvaluateBody {
    subject: String,
    risk_level: RiskLevel,
}

pub async fn evaluate(State(state): State<AppState>, Json(body): Json<EvaluateBody>) -> ApiResult<Json<Value>> {
    let decision = state.council.evaluate(&body.subject, body.risk_level).await?;
    Ok(Json(json!(decision)))
}

pub async fn queue(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.council.queue().await))
}

pub async fn approve(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    Ok(Json(json!(state.council.resolve(id, true).await?)))
}

pub async fn reject(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    Ok(Json(json!(state.council.resolve(id, false).await?)))
}

#[derive(Deserialize)]
pub struct DecisionsQuery {
    decision: Option<Decision>,
    limit: Option<usize>,
}

pub async fn decisions(State(state): State<AppState>, Query(q): Query<DecisionsQuery>) -> Json<Value> {
    let decisions = state.council.list(q.decision, q.limit.unwrap_or(50)).await;
    Json(json!(decisions))
}
