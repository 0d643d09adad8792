use std::sync::Arc;
use crate::enums::ai_provider_error::AiProviderError;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::services::rate_limiter::ApiRateLimiter;
use crate::structs::config::ai_config::AiConfig;
use crate::traits::ai_provider::AiProvider;

pub mod anthropic;
pub mod openai;

/// Builds the configured provider. The API key variable is read here, once, at startup.
pub fn build_provider(config: &AiConfig) -> SpectraceResult<Arc<dyn AiProvider>> {
    let api_key = std::env::var(&config.api_key_env).map_err(|_| {
        SpectraceError::config_error(
            &format!("Environment variable {} is not set", config.api_key_env),
            Some("ai.api_key_env"),
            Some("Export the API key or point ai.api_key_env at the right variable"),
        )
    })?;
    let rate_limiter = Arc::new(ApiRateLimiter::new(config.rate_limit_per_minute, config.burst_per_second));
    let to_config_error = |e: AiProviderError| SpectraceError::config_error(&e.to_string(), Some("ai"), None);

    let provider: Arc<dyn AiProvider> = match config.provider.as_str() {
        "openai" => Arc::new(openai::OpenAIProvider::new(api_key, config, rate_limiter).map_err(to_config_error)?),
        "anthropic" => Arc::new(anthropic::AnthropicProvider::new(api_key, config, rate_limiter).map_err(to_config_error)?),
        other => {
            return Err(SpectraceError::config_error(
                &format!("Unknown AI provider '{}'", other),
                Some("ai.provider"),
                Some("Use \"openai\" or \"anthropic\""),
            ))
        }
    };

    log::info!("🤖 Using {} provider with model {}", provider.name(), provider.model());
    Ok(provider)
}

pub(crate) fn send_error(error: &reqwest::Error, timeout_secs: u64) -> AiProviderError {
    if error.is_timeout() {
        AiProviderError::Timeout(timeout_secs)
    } else {
        AiProviderError::NetworkError(error.to_string())
    }
}
