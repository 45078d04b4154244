use crate::error::CoordResult;
use crate::http::AppState;
use crate::model::DelegationOutcome;
use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

/// One callable unit in the MCP-style surface. `call` takes a JSON object
/// of arguments and returns a JSON result, the same shape an HTTP handler
/// would hand back - these are adapters, not a second implementation.
#[async_trait]
pub trait McpTool: Send + Sync {
    fn name(&self) -> &'static str;
    async fn call(&self, args: Value) -> CoordResult<Value>;
}

fn field<'a>(args: &'a Value, key: &str) -> CoordResult<&'a Value> {
    args.get(key)
        .ok_or_else(|| crate::error::CoordError::validation(format!("missing argument '{key}'")))
}

fn str_field(args: &Value, key: &str) -> CoordResult<String> {
    field(args, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| crate::error::CoordError::validation(format!("argument '{key}' must be a string")))
}

fn uuid_field(args: &Value, key: &str) -> CoordResult<Uuid> {
    let s = str_field(args, key)?;
    Uuid::parse_str(&s).map_err(|e| crate::error::CoordError::validation(format!("argument '{key}' is not a uuid: {e}")))
}

pub struct LogConductorReasoning {
    state: AppState,
}

impl LogConductorReasoning {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl McpTool for LogConductorReasoning {
    fn name(&self) -> &'static str {
        "log_conductor_reasoning"
    }

    async fn call(&self, args: Value) -> CoordResult<Value> {
        let work_order_id = uuid_field(&args, "work_order_id")?;
        let mission_id = args.get("mission_id").and_then(Value::as_str).map(str::to_string);
        let conductor_agent = str_field(&args, "conductor_agent")?;
        let delegation_target = str_field(&args, "delegation_target")?;
        let reasoning = str_field(&args, "reasoning")?;
        let injected_context = args.get("context_injected").cloned().unwrap_or_else(|| json!({}));
        let decision_factors = args
            .get("decision_factors")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        let confidence = args.get("confidence_score").and_then(Value::as_f64).map(|c| c as f32);

        let entry = self
            .state
            .conductor_log
            .log_reasoning(
                work_order_id,
                mission_id,
                &conductor_agent,
                &delegation_target,
                &reasoning,
                injected_context,
                decision_factors,
                confidence,
            )
            .await?;
        Ok(json!(entry))
    }
}

pub struct UpdateDelegationOutcome {
    state: AppState,
}

impl UpdateDelegationOutcome {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl McpTool for UpdateDelegationOutcome {
    fn name(&self) -> &'static str {
        "update_delegation_outcome"
    }

    async fn call(&self, args: Value) -> CoordResult<Value> {
        let id = uuid_field(&args, "conductor_log_id")?;
        let outcome_str = str_field(&args, "outcome")?;
        let outcome: DelegationOutcome = outcome_str.parse()?;
        let outcome_notes = args.get("outcome_notes").and_then(Value::as_str).map(str::to_string);
        let entry = self.state.conductor_log.update_outcome(id, outcome, outcome_notes).await?;
        Ok(json!(entry))
    }
}

pub struct GetWorkOrderReasoning {
    state: AppState,
}

impl GetWorkOrderReasoning {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl McpTool for GetWorkOrderReasoning {
    fn name(&self) -> &'static str {
        "get_work_order_reasoning"
    }

    async fn call(&self, args: Value) -> CoordResult<Value> {
        let work_order_id = uuid_field(&args, "work_order_id")?;
        let (entries, summary) = self.state.conductor_log.work_order_reasoning(work_order_id).await;
        Ok(json!({ "entries": entries, "summary": summary }))
    }
}

pub struct SearchSessions {
    state: AppState,
}

impl SearchSessions {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl McpTool for SearchSessions {
    fn name(&self) -> &'static str {
        "search_sessions"
    }

    async fn call(&self, args: Value) -> CoordResult<Value> {
        let query = str_field(&args, "query")?;
        let threshold = args.get("threshold").and_then(Value::as_f64).map(|t| t as f32);
        let results = self.state.sessions.search_sessions(&query, threshold).await?;
        let shaped: Vec<Value> = results
            .into_iter()
            .map(|r| json!({ "session": r.session, "score": r.score }))
            .collect();
        Ok(json!(shaped))
    }
}
