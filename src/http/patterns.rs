use super::error::ApiResult;
use super::AppState;
use crate::model::pattern::PatternType;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct HarvestBody {
    pattern_type: PatternType,
    domain: String,
    description: String,
    action: String,
    outcome: Option<String>,
    context: Option<Value>,
    created_by: String,
}

pub async fn harvest(State(state): State<AppState>, Json(body): Json<HarvestBody>) -> ApiResult<Json<Value>> {
    let pattern = state
        .patterns
        .harvest(
            body.pattern_type,
            &body.domain,
            &body.description,
            &body.action,
            body.outcome,
            body.context.unwrap_or_else(|| json!({})),
            &body.created_by,
        )
        .await?;
    Ok(Json(json!(pattern)))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    query: String,
    domain: Option<String>,
    limit: Option<usize>,
}

pub async fn search(State(state): State<AppState>, Query(q): Query<SearchQuery>) -> ApiResult<Json<Value>> {
    let results = state
        .patterns
        .search(&q.query, q.domain.as_deref(), q.limit.unwrap_or(20))
        .await?;
    let shaped: Vec<Value> = results
        .into_iter()
        .map(|r| json!({ "pattern": r.pattern, "score": r.score }))
        .collect();
    Ok(Json(json!(shaped)))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let with_stats = state.patterns.get_with_stats(id).await?;
    Ok(Json(json!({
        "pattern": with_stats.pattern,
        "observation_count": with_stats.observation_count,
        "average_rating": with_stats.average_rating,
    })))
}

#[derive(Deserialize)]
pub struct ObserveBody {
    session_id: Option<Uuid>,
    rating: Option<f32>,
    notes: Option<String>,
}

pub async fn observe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ObserveBody>,
) -> ApiResult<Json<Value>> {
    let observation = state
        .patterns
        .record_observation(id, body.session_id, body.rating, body.notes)
        .await?;
    Ok(Json(json!(observation)))
}

pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.patterns.stats().await))
}
