use super::EmbeddingProvider;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded-hash embedding used offline and in tests: folds a hash of the
/// text into a short vector. Never calls the network, and the gateway's
/// zero-pad path exercises the dimension-normalization logic for real
/// since this provider's native width (64) is well under 1536.
#[derive(Debug, Default, Clone)]
pub struct DeterministicEmbeddingProvider;

const NATIVE_DIM: usize = 64;

#[async_trait]
impl EmbeddingProvider for DeterministicEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                let seed = hasher.finish();
                let v: Vec<f32> = (0..NATIVE_DIM)
                    .map(|i| {
                        let mixed = seed.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(i as u64);
                        ((mixed >> 40) as f32 / u32::MAX as f32) * 2.0 - 1.0
                    })
                    .collect();
                Some(v)
            })
            .collect()
    }
}
