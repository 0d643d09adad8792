use async_trait::async_trait;
use crate::enums::ai_provider_error::AiProviderError;

/// A chat-style reasoning backend. One call, one complete reply; retries live above this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn chat(&self, system_prompt: String, user_prompts: Vec<String>) -> Result<String, AiProviderError>;

    fn name(&self) -> String;

    fn model(&self) -> String;
}
