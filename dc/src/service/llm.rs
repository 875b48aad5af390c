//! Decision service backed by an LLM

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::DecisionService;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::{PromptContext, PromptLoader};
use crate::session::{DecisionRequest, ServiceError};

/// Renders the request prompt and asks the model once
pub struct LlmDecisionService {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl LlmDecisionService {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        Self {
            client,
            prompts,
            max_tokens,
        }
    }

    fn render(&self, request: &DecisionRequest) -> Result<String, ServiceError> {
        let context = PromptContext::new(
            request.category_label(),
            request.pool(),
            request.mood().map(|m| m.label().to_string()),
        );
        self.prompts
            .decision_prompt(&context)
            .map_err(|e| ServiceError::Prompt(e.to_string()))
    }
}

#[async_trait]
impl DecisionService for LlmDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<String, ServiceError> {
        debug!(category = %request.category(), max_tokens = self.max_tokens, "decide: called");
        let prompt = self.render(request)?;

        let completion = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self.client.complete(completion).await.map_err(|e| {
            warn!(error = %e, transport = e.is_transport(), "decide: completion failed");
            ServiceError::Unavailable(e.to_string())
        })?;

        debug!(stop_reason = ?response.stop_reason, output_tokens = response.usage.output_tokens, "decide: completed");
        Ok(response.content.unwrap_or_default())
    }

    fn name(&self) -> &str {
        "llm"
    }
}
