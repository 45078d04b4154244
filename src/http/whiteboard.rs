use super::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn get(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.whiteboard.lock().await.clone();
    Json(json!(snapshot))
}
