use super::error::ApiResult;
use super::AppState;
use crate::model::DelegationOutcome;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct LogReasoningBody {
    work_order_id: Uuid,
    mission_id: Option<String>,
    conductor_agent: String,
    delegation_target: String,
    reasoning: String,
    #[serde(default)]
    context_injected: Value,
    #[serde(default)]
    decision_factors: Vec<String>,
    confidence_score: Option<f32>,
}

pub async fn log_reasoning(
    State(state): State<AppState>,
    Json(body): Json<LogReasoningBody>,
) -> ApiResult<Json<Value>> {
    let entry = state
        .conductor_log
        .log_reasoning(
            body.work_order_id,
            body.mission_id,
            &body.conductor_agent,
            &body.delegation_target,
            &body.reasoning,
            body.context_injected,
            body.decision_factors,
            body.confidence_score,
        )
        .await?;
    Ok(Json(json!(entry)))
}

#[derive(Deserialize)]
pub struct OutcomeBody {
    outcome: DelegationOutcome,
    outcome_notes: Option<String>,
}

pub async fn update_outcome(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<OutcomeBody>,
) -> ApiResult<Json<Value>> {
    let entry = state
        .conductor_log
        .update_outcome(id, body.outcome, body.outcome_notes)
        .await?;
    Ok(Json(json!(entry)))
}

pub async fn work_order_reasoning(State(state): State<AppState>, Path(work_order_id): Path<Uuid>) -> Json<Value> {
    let (entries, summary) = state.conductor_log.work_order_reasoning(work_order_id).await;
    Json(json!({ "entries": entries, "summary": summary }))
}
