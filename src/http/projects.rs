use super::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.store.list_active_projects().await))
}

pub async fn tasks(State(state): State<AppState>, Path(project_id): Path<Uuid>) -> Json<Value> {
    Json(json!(state.store.list_tasks(project_id).await))
}
