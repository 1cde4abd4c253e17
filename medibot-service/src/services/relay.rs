//! The message relay pipeline: prompt, bounded upstream call, defensive decode.

use crate::models::ClassifiedReply;
use crate::services::metrics;
use crate::services::prompts::build_prompt;
use crate::services::providers::{ProviderError, TextProvider};
use crate::services::reply_parser::parse_model_reply;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Relays one chat message to the completion provider under a deadline.
#[derive(Clone)]
pub struct MessageRelay {
    provider: Arc<dyn TextProvider>,
    timeout: Duration,
}

impl MessageRelay {
    pub fn new(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classify `message` via the provider.
    ///
    /// Only the upstream call can fail. When the deadline passes the call's future is
    /// dropped, which aborts the request and releases its connection.
    pub async fn relay(&self, message: &str) -> Result<ClassifiedReply, ProviderError> {
        let prompt = build_prompt(message);
        let provider = self.provider.name();
        let start = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, self.provider.generate(&prompt)).await;
        let elapsed = start.elapsed().as_secs_f64();

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                metrics::record_upstream_request(provider, e.kind(), elapsed);
                tracing::error!(provider, error = %e, "Upstream request failed");
                return Err(e);
            }
            Err(_) => {
                let e = ProviderError::Timeout(self.timeout);
                metrics::record_upstream_request(provider, e.kind(), elapsed);
                tracing::error!(
                    provider,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Upstream request timed out"
                );
                return Err(e);
            }
        };

        metrics::record_upstream_request(provider, "ok", elapsed);

        let reply = parse_model_reply(&response.text);
        metrics::record_condition_level(reply.condition_level.as_str());

        Ok(reply)
    }
}
