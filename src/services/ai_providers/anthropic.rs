use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use crate::config::constants::{ANTHROPIC_BASE_URL, ANTHROPIC_VERSION};
use crate::enums::ai_provider_error::AiProviderError;
use crate::services::ai_providers::send_error;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::ai::anthropic::anthropic_message::AnthropicMessage;
use crate::structs::ai::anthropic::anthropic_message_request::AnthropicMessageRequest;
use crate::structs::ai::anthropic::anthropic_response::AnthropicResponse;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

#[derive(Clone)]
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
    rate_limiter: Arc<ApiRateLimiter>,
}

impl AnthropicProvider {
    pub fn new(api_key: String, config: &AiConfig, rate_limiter: Arc<ApiRateLimiter>) -> Result<Self, AiProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AiProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone().unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string()),
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.request_timeout_secs,
            rate_limiter,
        })
    }

    fn get_request(&self, system_prompt: String, user_prompts: Vec<String>) -> AnthropicMessageRequest {
        let messages = user_prompts
            .into_iter()
            .map(|content| AnthropicMessage { role: "user".to_string(), content })
            .collect();

        AnthropicMessageRequest {
            model: self.model.clone(),
            system: system_prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages,
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    async fn chat(&self, system_prompt: String, user_prompts: Vec<String>) -> Result<String, AiProviderError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/messages", self.base_url);
        let request_body = self.get_request(system_prompt, user_prompts);
        log::debug!("📦 Anthropic request, model {}", request_body.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("❌ Anthropic API error {}: {}", status, error_text);
            return Err(AiProviderError::from_status(status.as_u16(), error_text));
        }

        let body: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AiProviderError::SerializationError(e.to_string()))?;

        let text = body.text();
        if text.is_empty() {
            return Err(AiProviderError::SerializationError("No text content in response".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> String {
        "anthropic".to_string()
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
