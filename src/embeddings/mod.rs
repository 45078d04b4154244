//! Embedding gateway (C7): normalizes every call into the provider
//! regardless of which embedding model is behind it.

pub mod deterministic;
pub mod openai;

use async_trait::async_trait;

pub use deterministic::DeterministicEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

/// Every real vector store in this deployment is dimensioned for 1536,
/// OpenAI's `text-embedding-3-small` size; the gateway normalizes shorter
/// provider output up to this length by zero-padding.
pub const EMBEDDING_DIM: usize = 1536;

/// Text longer than this is truncated before being sent to the provider,
/// matching the original's embedding helper.
pub const MAX_INPUT_CHARS: usize = 8000;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// One embedding per input text, in the same order, `None` on a
    /// per-item provider failure.
    async fn embed_batch(&self, texts: &[String]) -> Vec<Option<Vec<f32>>>;
}

pub struct EmbeddingGateway {
    provider: std::sync::Arc<dyn EmbeddingProvider>,
}

impl EmbeddingGateway {
    pub fn new(provider: std::sync::Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// `None` for empty/whitespace-only text, without calling the
    /// provider at all.
    pub async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        self.embed_batch(std::slice::from_ref(&text.to_string()))
            .await
            .into_iter()
            .next()
            .flatten()
    }

    pub async fn embed_batch(&self, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        let mut blank_mask = Vec::with_capacity(texts.len());
        let mut to_embed = Vec::new();
        for t in texts {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                blank_mask.push(true);
            } else {
                blank_mask.push(false);
                to_embed.push(truncate(trimmed));
            }
        }

        let raw_vec = if to_embed.is_empty() {
            Vec::new()
        } else {
            self.provider.embed_batch(&to_embed).await
        };
        let mut raw = raw_vec.into_iter();

        blank_mask
            .into_iter()
            .map(|blank| {
                if blank {
                    None
                } else {
                    raw.next().flatten().map(|v| normalize_dim(v, EMBEDDING_DIM))
                }
            })
            .collect()
    }

    /// Embeds a batch with a minimum 500ms spacing between provider calls,
    /// for backfill-style bulk operations that must not hammer the
    /// provider.
    pub async fn embed_batch_throttled(&self, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await);
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
        results
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_INPUT_CHARS).collect()
}

fn normalize_dim(mut v: Vec<f32>, dim: usize) -> Vec<f32> {
    if v.len() < dim {
        v.resize(dim, 0.0);
    } else {
        v.truncate(dim);
    }
    v
}

/// Cosine similarity, used by the in-memory pattern/session search paths
/// that stand in for the vector database's `search_*_semantic` RPCs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_text_never_reaches_the_provider() {
        let gateway = EmbeddingGateway::new(std::sync::Arc::new(DeterministicEmbeddingProvider));
        assert!(gateway.embed("   ").await.is_none());
        assert!(gateway.embed("").await.is_none());
    }

    #[tokio::test]
    async fn non_blank_text_is_normalized_to_embedding_dim() {
        let gateway = EmbeddingGateway::new(std::sync::Arc::new(DeterministicEmbeddingProvider));
        let v = gateway.embed("hello world").await.unwrap();
        assert_eq!(v.len(), EMBEDDING_DIM);
    }

    #[test]
    fn cosine_similarity_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_of_zero_vector_is_zero_not_nan() {
        let z = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&z, &v), 0.0);
    }
}
