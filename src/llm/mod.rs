//! LLM provider boundary. Used by session summarization (C8), pattern
//! extraction (C9), and plan promotion (C16) - the three places the
//! original reaches for a chat-completion call.

pub mod anthropic;
pub mod deterministic;

use crate::error::CoordResult;
use crate::model::pattern::PatternCandidate;
use crate::model::session::SessionSummary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub feature: Option<String>,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn summarize_session(
        &self,
        agent_name: &str,
        transcript: &str,
    ) -> CoordResult<SessionSummary>;

    async fn extract_patterns(&self, transcript: &str) -> CoordResult<Vec<PatternCandidate>>;

    /// Extracts 10-20 tasks from a plan document. `content` is truncated
    /// to 8000 characters by the caller before this is invoked.
    async fn extract_tasks(&self, plan_content: &str) -> CoordResult<Vec<ExtractedTask>>;
}

pub use anthropic::AnthropicProvider;
pub use deterministic::DeterministicLlmProvider;

/// Picks a provider the way `plan_promoter_service._get_api_key_and_provider`
/// does: `ANTHROPIC_API_KEY` wins if present, then `OPENAI_API_KEY`-style
/// fallback would apply if we had an OpenAI chat provider; absent both, a
/// deterministic offline provider keeps the service usable in tests/dev.
pub fn from_config(cfg: &crate::config::Config) -> std::sync::Arc<dyn LlmProvider> {
    if let Some(key) = &cfg.anthropic_api_key {
        std::sync::Arc::new(AnthropicProvider::new(key.clone()))
    } else {
        std::sync::Arc::new(DeterministicLlmProvider::default())
    }
}
