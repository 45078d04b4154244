use super::EmbeddingProvider;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const API_URL: &str = "https://api.openai.com/v1/embeddings";
const MODEL: &str = "text-embedding-3-small";

pub struct OpenAiEmbeddingProvider {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        let body = json!({ "model": MODEL, "input": texts });

        let resp = match self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(status = %r.status(), "OpenAI embeddings call failed");
                return vec![None; texts.len()];
            }
            Err(e) => {
                warn!(error = %e, "OpenAI embeddings call errored");
                return vec![None; texts.len()];
            }
        };

        let parsed: EmbeddingsResponse = match resp.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "failed to parse OpenAI embeddings response");
                return vec![None; texts.len()];
            }
        };

        let mut out: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        for datum in parsed.data {
            if let Some(slot) = out.get_mut(datum.index) {
                *slot = Some(datum.embedding);
            }
        }
        out
    }
}
