//! Mock provider implementation for testing.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock does when asked to generate.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this text.
    Reply(String),
    /// Return a response with no text.
    Empty,
    /// Fail with `ProviderError::ApiError` carrying this message.
    Fail(String),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    model: String,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            model: "mock-model".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(message.into()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        let text = match &self.behavior {
            MockBehavior::Reply(text) => Some(text.clone()),
            MockBehavior::Empty => None,
            MockBehavior::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
        };

        Ok(ProviderResponse {
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: text.as_ref().map_or(0, |t| t.len() as i32 / 4),
            text,
            finish_reason: FinishReason::Complete,
        })
    }
}
