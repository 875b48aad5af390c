//! Decision request formation

use serde::Serialize;
use tracing::debug;

use super::SessionError;
use crate::domain::{Category, CategoryId, Mood};

/// What gets sent to the decision service
///
/// The pool is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRequest {
    category: CategoryId,
    category_label: String,
    pool: Vec<String>,
    mood: Option<Mood>,
}

impl DecisionRequest {
    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn category_label(&self) -> &str {
        &self.category_label
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Advisory only; never filters or reorders the pool
    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }
}

/// Composes requests from (category, pool, mood)
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionRequestBuilder;

impl DecisionRequestBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, category: &Category, pool: Vec<String>, mood: Option<Mood>) -> Result<DecisionRequest, SessionError> {
        debug!(category = %category.id, pool_len = pool.len(), ?mood, "build: called");
        if pool.is_empty() {
            debug!(category = %category.id, "build: empty pool");
            return Err(SessionError::EmptyPool { category: category.id });
        }

        Ok(DecisionRequest {
            category: category.id,
            category_label: category.label.to_string(),
            pool,
            mood,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryRegistry;

    #[test]
    fn test_build_keeps_pool_and_mood() {
        let registry = CategoryRegistry::new();
        let category = registry.get(CategoryId::Work);
        let pool = vec!["Plan tomorrow".to_string(), "Review goals".to_string()];

        let request = DecisionRequestBuilder::new()
            .build(category, pool.clone(), Some(Mood::Stressed))
            .unwrap();

        assert_eq!(request.category(), CategoryId::Work);
        assert_eq!(request.category_label(), "Focus");
        assert_eq!(request.pool(), pool.as_slice());
        assert_eq!(request.mood(), Some(Mood::Stressed));
    }

    #[test]
    fn test_build_empty_pool_fails() {
        let registry = CategoryRegistry::new();
        let err = DecisionRequestBuilder::new()
            .build(registry.get(CategoryId::Custom), vec![], None)
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::EmptyPool {
                category: CategoryId::Custom
            }
        );
    }
}
