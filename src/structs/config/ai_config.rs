use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AiConfig {
    #[serde(default = "ConfigHelper::default_provider")]
    pub provider: String,

    #[serde(default = "ConfigHelper::default_model")]
    pub model: String,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "ConfigHelper::default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "ConfigHelper::default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "ConfigHelper::default_temperature")]
    pub temperature: f32,

    #[serde(default = "ConfigHelper::default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "ConfigHelper::default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "ConfigHelper::default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "ConfigHelper::default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    #[serde(default = "ConfigHelper::default_burst_per_second")]
    pub burst_per_second: u32,
}

impl AiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ConfigHelper::default_provider(),
            model: ConfigHelper::default_model(),
            base_url: None,
            api_key_env: ConfigHelper::default_api_key_env(),
            max_tokens: ConfigHelper::default_max_tokens(),
            temperature: ConfigHelper::default_temperature(),
            request_timeout_secs: ConfigHelper::default_request_timeout_secs(),
            max_attempts: ConfigHelper::default_max_attempts(),
            backoff_ms: ConfigHelper::default_backoff_ms(),
            rate_limit_per_minute: ConfigHelper::default_rate_limit_per_minute(),
            burst_per_second: ConfigHelper::default_burst_per_second(),
        }
    }
}
