//! Generative model provider abstraction.
//!
//! Handlers only see [`TextProvider`], so the Gemini client can be swapped
//! for the mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
///
/// The `Display` text is what clients see after the
/// "Error generating response: " / "Error analyzing file: " prefix.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Generated text, if the model returned any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

impl ProviderResponse {
    /// The generated text, treating an empty string the same as no text.
    pub fn into_text(self) -> Option<String> {
        self.text.filter(|text| !text.is_empty())
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Error,
}

/// Generation parameters for model requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,
}

/// Prompt-in, text-out model client.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Model identifier reported back to clients.
    fn model(&self) -> &str;

    /// Generate a single, non-streaming response.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: Option<&str>) -> ProviderResponse {
        ProviderResponse {
            text: text.map(str::to_string),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Complete,
        }
    }

    #[test]
    fn empty_text_is_treated_as_absent() {
        assert_eq!(response(Some("")).into_text(), None);
        assert_eq!(response(None).into_text(), None);
        assert_eq!(response(Some(" ")).into_text(), Some(" ".to_string()));
    }

    #[test]
    fn provider_errors_render_their_message() {
        let err = ProviderError::ApiError("quota exceeded".to_string());
        assert_eq!(err.to_string(), "API error: quota exceeded");
    }
}
