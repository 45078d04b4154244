//! MCP-style tool surface: the same services the HTTP layer calls,
//! reachable as a handful of named tools instead of routes. No business
//! logic lives here - every tool is a thin adapter over `http::AppState`'s
//! services, so an agent-tool-calling caller and an HTTP caller always see
//! identical semantics.

mod tools;

pub use tools::{
    GetWorkOrderReasoning, LogConductorReasoning, McpTool, SearchSessions, UpdateDelegationOutcome,
};

use crate::http::AppState;
use serde_json::Value;

/// Builds the full tool set for a given `AppState`, keyed by tool name.
pub fn registry(state: AppState) -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(LogConductorReasoning::new(state.clone())),
        Box::new(UpdateDelegationOutcome::new(state.clone())),
        Box::new(GetWorkOrderReasoning::new(state.clone())),
        Box::new(SearchSessions::new(state)),
    ]
}

pub async fn dispatch(tools: &[Box<dyn McpTool>], name: &str, args: Value) -> crate::error::CoordResult<Value> {
    let tool = tools
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| crate::error::CoordError::not_found(format!("unknown mcp tool '{name}'")))?;
    tool.call(args).await
}
