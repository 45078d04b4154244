use super::MemoryStore;
use crate::error::{CoordError, CoordResult};
use crate::model::{Pattern, PatternObservation, PatternStats};
use std::collections::HashMap;
use uuid::Uuid;

impl MemoryStore {
    pub async fn insert_pattern(&self, pattern: Pattern) -> CoordResult<Pattern> {
        self.patterns.insert(pattern.id, pattern.clone());
        self.observations.entry(pattern.id).or_default();
        Ok(pattern)
    }

    pub async fn get_pattern(&self, id: Uuid) -> CoordResult<Pattern> {
        self.patterns
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| CoordError::not_found(format!("pattern {id}")))
    }

    pub async fn all_patterns(&self) -> Vec<Pattern> {
        self.patterns.iter().map(|e| e.value().clone()).collect()
    }

    pub async fn add_observation(&self, observation: PatternObservation) -> CoordResult<PatternObservation> {
        if !self.patterns.contains_key(&observation.pattern_id) {
            return Err(CoordError::not_found(format!("pattern {}", observation.pattern_id)));
        }
        self.observations
            .entry(observation.pattern_id)
            .or_default()
            .push(observation.clone());
        Ok(observation)
    }

    pub async fn get_observations(&self, pattern_id: Uuid) -> Vec<PatternObservation> {
        self.observations
            .get(&pattern_id)
            .map(|o| o.value().clone())
            .unwrap_or_default()
    }

    /// `observation_count`/`average_rating` computed by joining the
    /// observation table, matching `pattern_service.get_pattern`.
    pub async fn observation_count(&self, pattern_id: Uuid) -> u64 {
        self.get_observations(pattern_id).await.len() as u64
    }

    pub async fn average_rating(&self, pattern_id: Uuid) -> Option<f32> {
        let ratings: Vec<f32> = self
            .get_observations(pattern_id)
            .await
            .into_iter()
            .filter_map(|o| o.rating)
            .collect();
        if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f32>() / ratings.len() as f32)
        }
    }

    pub async fn pattern_stats(&self) -> PatternStats {
        let patterns = self.all_patterns().await;
        let mut by_type: HashMap<String, u64> = HashMap::new();
        for p in &patterns {
            *by_type.entry(format!("{:?}", p.pattern_type).to_lowercase()).or_insert(0) += 1;
        }
        let total_observations: u64 = self
            .observations
            .iter()
            .map(|e| e.value().len() as u64)
            .sum();
        PatternStats {
            total_patterns: patterns.len() as u64,
            total_observations,
            by_type,
        }
    }
}
