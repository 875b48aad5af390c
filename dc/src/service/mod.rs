//! Decision service adapters
//!
//! A `DecisionService` turns a `DecisionRequest` into raw text. Validation
//! happens in the session, so adapters never parse their own output.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, eyre};
use tracing::debug;

use crate::config::Config;
use crate::llm::create_client;
use crate::prompts::PromptLoader;
use crate::session::{DecisionRequest, ServiceError};

mod llm;
mod random;

pub use llm::LlmDecisionService;
pub use random::RandomDecisionService;

/// External collaborator that picks one option from a request's pool
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// One attempt; the raw text is untrusted
    async fn decide(&self, request: &DecisionRequest) -> Result<String, ServiceError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Create a decision service based on the provider specified in config
pub fn create_service(config: &Config) -> Result<Arc<dyn DecisionService>> {
    debug!(provider = %config.llm.provider, "create_service: called");
    match config.llm.provider.as_str() {
        "local" => {
            debug!("create_service: creating random service");
            Ok(Arc::new(RandomDecisionService::new()))
        }
        "anthropic" => {
            debug!("create_service: creating LLM service");
            let client = create_client(&config.llm)?;
            let prompts = PromptLoader::new(config.decision.expanded_template_path());
            Ok(Arc::new(LlmDecisionService::new(
                client,
                prompts,
                config.decision.max_tokens,
            )))
        }
        other => Err(eyre!(
            "Unknown LLM provider: '{}'. Supported: anthropic, local",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_service_local() {
        let mut config = Config::default();
        config.llm.provider = "local".to_string();
        let service = create_service(&config).unwrap();
        assert_eq!(service.name(), "local");
    }

    #[test]
    fn test_create_service_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "oracle".to_string();
        let err = create_service(&config).err().unwrap();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_create_service_anthropic_without_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "DECIDE_TEST_KEY_NEVER_SET".to_string();
        assert!(create_service(&config).is_err());
    }
}
