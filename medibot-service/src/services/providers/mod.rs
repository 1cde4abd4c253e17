//! Completion provider abstraction.
//!
//! The relay talks to the model through [`TextProvider`] so the Gemini client can be
//! swapped for a mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
}

impl ProviderError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Unspecified,
}

impl FinishReason {
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            Some("STOP") => FinishReason::Complete,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST") => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Unspecified,
        }
    }
}

/// Result of a provider call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// First candidate's text, empty when the upstream returned none.
    pub text: String,

    /// Input tokens consumed, when reported.
    pub input_tokens: Option<i32>,

    /// Output tokens generated, when reported.
    pub output_tokens: Option<i32>,

    pub finish_reason: FinishReason,
}

impl ProviderResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            input_tokens: None,
            output_tokens: None,
            finish_reason: FinishReason::Complete,
        }
    }
}

/// Single-turn text completion.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Send `prompt` as one user turn and return the first candidate.
    ///
    /// Implementations must not impose their own deadline shorter than the caller's;
    /// the relay cancels the returned future when its deadline passes.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;
}
