//! Mock provider implementation for testing.

use super::{ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does when called.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this text as the first candidate.
    Reply(String),
    /// Fail as if the network call broke.
    Fail(String),
    /// Wait this long before replying with empty text.
    Delay(Duration),
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Reply(text.into()))
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(ProviderResponse::text(text.clone())),
            MockBehavior::Fail(reason) => Err(ProviderError::NetworkError(reason.clone())),
            MockBehavior::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(ProviderResponse::text(""))
            }
        }
    }
}
