//! Offline decision service that picks uniformly at random

use std::sync::Mutex;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::debug;

use super::DecisionService;
use crate::session::{DecisionRequest, ServiceError};

/// Picks from the pool with `rand` and answers in the same JSON shape a model would
pub struct RandomDecisionService {
    rng: Mutex<StdRng>,
}

impl Default for RandomDecisionService {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomDecisionService {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic picks for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl DecisionService for RandomDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<String, ServiceError> {
        debug!(category = %request.category(), pool_len = request.pool().len(), "decide: called");
        let choice = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| ServiceError::Unavailable("random source poisoned".to_string()))?;
            request
                .pool()
                .choose(&mut *rng)
                .cloned()
                .ok_or_else(|| ServiceError::Unavailable("nothing to choose from".to_string()))?
        };

        let reasoning = match request.mood() {
            Some(mood) => format!("Picked at random from {} options for {}.", request.pool().len(), mood),
            None => format!("Picked at random from {} options.", request.pool().len()),
        };

        Ok(serde_json::json!({ "choice": choice, "reasoning": reasoning }).to_string())
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryId, CategoryRegistry};
    use crate::session::{DecisionRequestBuilder, ResponseValidator};

    fn request() -> DecisionRequest {
        let registry = CategoryRegistry::new();
        let category = registry.get(CategoryId::Activities);
        DecisionRequestBuilder::new()
            .build(category, category.suggestions.iter().map(|s| s.to_string()).collect(), None)
            .unwrap()
    }

    #[tokio::test]
    async fn test_output_validates_and_is_from_pool() {
        let service = RandomDecisionService::new();
        let request = request();

        for _ in 0..20 {
            let raw = service.decide(&request).await.unwrap();
            let decision = ResponseValidator::new().validate(&raw).unwrap();
            assert!(request.pool().contains(&decision.choice));
            assert!(decision.reasoning.is_some());
        }
    }

    #[tokio::test]
    async fn test_seeded_is_deterministic() {
        let request = request();
        let a = RandomDecisionService::seeded(7);
        let b = RandomDecisionService::seeded(7);

        for _ in 0..5 {
            assert_eq!(a.decide(&request).await.unwrap(), b.decide(&request).await.unwrap());
        }
    }
}
