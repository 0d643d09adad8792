use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use crate::config::constants::OPENAI_BASE_URL;
use crate::enums::ai_provider_error::AiProviderError;
use crate::services::ai_providers::send_error;
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::ai::openai::openai_message::OpenAIMessage;
use crate::structs::ai::openai::openai_request::OpenAIRequest;
use crate::structs::ai::openai::openai_response::OpenAIResponse;
use crate::structs::ai::openai::openai_response_format::OpenAIResponseFormat;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

#[derive(Clone)]
pub struct OpenAIProvider {
    api_key: String,
    base_url: String,
    client: Client,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
    rate_limiter: Arc<ApiRateLimiter>,
}

impl OpenAIProvider {
    pub fn new(api_key: String, config: &AiConfig, rate_limiter: Arc<ApiRateLimiter>) -> Result<Self, AiProviderError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AiProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone().unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.request_timeout_secs,
            rate_limiter,
        })
    }

    fn get_openai_messages(&self, system_prompt: String, user_prompts: Vec<String>) -> Vec<OpenAIMessage> {
        let mut messages = Vec::new();

        if !system_prompt.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: system_prompt,
            });
        }

        for prompt in user_prompts {
            messages.push(OpenAIMessage {
                role: "user".to_string(),
                content: prompt,
            });
        }

        messages
    }

    fn get_request(&self, system_prompt: String, user_prompts: Vec<String>) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: self.get_openai_messages(system_prompt, user_prompts),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: OpenAIResponseFormat::json_object(),
        }
    }
}

#[async_trait]
impl AiProvider for OpenAIProvider {
    async fn chat(&self, system_prompt: String, user_prompts: Vec<String>) -> Result<String, AiProviderError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = self.get_request(system_prompt, user_prompts);
        log::debug!("📦 OpenAI request, model {}", request_body.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("❌ OpenAI API error {}: {}", status, error_text);
            return Err(AiProviderError::from_status(status.as_u16(), error_text));
        }

        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AiProviderError::SerializationError(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiProviderError::SerializationError("No content in response".to_string()))
    }

    fn name(&self) -> String {
        "openai".to_string()
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_asks_for_a_json_object() {
        let provider = OpenAIProvider::new("key".to_string(), &AiConfig::default(), Arc::new(ApiRateLimiter::default())).unwrap();
        let request = provider.get_request("system".to_string(), vec!["old vs new".to_string()]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "old vs new");
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let provider = OpenAIProvider::new("key".to_string(), &AiConfig::default(), Arc::new(ApiRateLimiter::default())).unwrap();
        let messages = provider.get_openai_messages(String::new(), vec!["only".to_string()]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }
}
