use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use crate::enums::ai_provider_error::AiProviderError;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

#[derive(Debug)]
pub struct ReasoningReply {
    pub content: String,
    pub attempts: u32,
}

/// Wraps a provider with a per-call deadline and bounded retries for transport failures.
pub struct ReasoningAdapter {
    ai_provider: Arc<dyn AiProvider>,
    max_attempts: u32,
    backoff: Duration,
    request_timeout: Duration,
}

impl ReasoningAdapter {
    pub fn new(ai_provider: Arc<dyn AiProvider>, config: &AiConfig) -> Self {
        Self::with_policy(ai_provider, config.max_attempts, config.backoff(), config.request_timeout())
    }

    pub fn with_policy(
        ai_provider: Arc<dyn AiProvider>,
        max_attempts: u32,
        backoff: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            ai_provider,
            max_attempts: max_attempts.max(1),
            backoff,
            request_timeout,
        }
    }

    pub fn provider_name(&self) -> String {
        self.ai_provider.name()
    }

    pub fn model(&self) -> String {
        self.ai_provider.model()
    }

    pub async fn complete(
        &self,
        operation: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> SpectraceResult<ReasoningReply> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            log::info!("🧠 {} via {} (attempt {}/{})", operation, self.ai_provider.name(), attempt, self.max_attempts);

            let call = self
                .ai_provider
                .chat(system_prompt.to_string(), vec![user_prompt.to_string()]);
            let outcome = match timeout(self.request_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(AiProviderError::Timeout(self.request_timeout.as_secs())),
            };

            let error = match outcome {
                Ok(content) => return Ok(ReasoningReply { content, attempts: attempt }),
                Err(error) => error,
            };

            if !error.is_transport() || attempt >= self.max_attempts {
                log::error!("❌ {} failed after {} attempt(s): {}", operation, attempt, error);
                return Err(SpectraceError::UpstreamTransportError {
                    operation: operation.to_string(),
                    status_code: error.status_code(),
                    attempts: attempt,
                    reason: error.to_string(),
                    retryable: error.is_transport(),
                });
            }

            let delay = self.backoff.saturating_mul(2u32.saturating_pow(attempt - 1));
            log::warn!("🔁 {} hit a transport error ({}), retrying in {}ms", operation, error, delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }
}
