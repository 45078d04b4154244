use super::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct PromoteBody {
    plan_path: String,
    plan_name: String,
}

/// Mirrors the original's `{"error": ..., "project_id": ...}` failure
/// shape rather than a bare 4xx - the project id is a retry handle, not
/// just diagnostic detail.
pub async fn promote(State(state): State<AppState>, Json(body): Json<PromoteBody>) -> (StatusCode, Json<Value>) {
    match state.plan_promoter.promote_plan(&body.plan_path, &body.plan_name).await {
        Ok((project, tasks)) => (StatusCode::OK, Json(json!({ "project": project, "tasks": tasks }))),
        Err(failure) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": failure.error.to_string(), "project_id": failure.project_id })),
        ),
    }
}
