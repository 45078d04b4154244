use super::{ExtractedTask, LlmProvider};
use crate::error::{CoordError, CoordResult, ResultExt};
use crate::model::pattern::PatternCandidate;
use crate::model::session::SessionSummary;
use async_trait::async_trait;
use serde_json::json;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const MODEL: &str = "claude-sonnet-4-6";

/// Thin `reqwest` client over the Anthropic messages API. Every call asks
/// for a single JSON object back and parses it strictly; a malformed reply
/// surfaces as a `Dependency` error rather than a panic.
pub struct AnthropicProvider {
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    async fn complete_json(&self, system: &str, user: &str) -> CoordResult<serde_json::Value> {
        let body = json!({
            "model": MODEL,
            "max_tokens": 2048,
            "system": system,
            "messages": [{"role": "user", "content": user}],
        });

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .dependency_context("call Anthropic messages API")?;

        if !resp.status().is_success() {
            return Err(CoordError::dependency(format!(
                "Anthropic API returned status {}",
                resp.status()
            )));
        }

        let parsed: serde_json::Value = resp
            .json()
            .await
            .dependency_context("parse Anthropic response body")?;

        let text = parsed["content"][0]["text"]
            .as_str()
            .ok_or_else(|| CoordError::dependency("Anthropic response missing content[0].text"))?;

        let stripped = strip_markdown_fences(text);
        serde_json::from_str(&stripped).map_err(|e| {
            CoordError::dependency(format!("Anthropic reply was not valid JSON: {e}"))
        })
    }
}

fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed)
        .strip_suffix("```")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn summarize_session(
        &self,
        agent_name: &str,
        transcript: &str,
    ) -> CoordResult<SessionSummary> {
        let system = "Summarize the agent session as JSON with keys: summary (string), \
            key_events (array of strings), decisions_made (array of strings), \
            outcomes (array of strings), next_steps (array of strings). \
            Respond with only the JSON object.";
        let user = format!("Agent: {agent_name}\n\nTranscript:\n{transcript}");
        let value = self.complete_json(system, &user).await?;
        serde_json::from_value(value)
            .map_err(|e| CoordError::dependency(format!("unexpected summary shape: {e}")))
    }

    async fn extract_patterns(&self, transcript: &str) -> CoordResult<Vec<PatternCandidate>> {
        let system = "Extract reusable patterns (success, failure, technical, process) from \
            this session transcript. Respond with a JSON array of objects with keys: \
            pattern_type, domain, description, action, outcome (nullable), confidence (0-1).";
        let value = self.complete_json(system, transcript).await?;
        serde_json::from_value(value)
            .map_err(|e| CoordError::dependency(format!("unexpected pattern list shape: {e}")))
    }

    async fn extract_tasks(&self, plan_content: &str) -> CoordResult<Vec<ExtractedTask>> {
        let truncated: String = plan_content.chars().take(8000).collect();
        let system = "Extract 10 to 20 concrete engineering tasks from this plan document. \
            Respond with a JSON array of objects with keys: title, description, \
            priority (one of low, medium, high, critical), feature (nullable string).";
        let value = self.complete_json(system, &truncated).await?;
        serde_json::from_value(value)
            .map_err(|e| CoordError::dependency(format!("unexpected task list shape: {e}")))
    }
}
