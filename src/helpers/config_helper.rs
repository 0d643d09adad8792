use std::path::PathBuf;
use crate::enums::severity::Severity;

pub struct ConfigHelper;

impl ConfigHelper {
    pub fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    pub fn default_port() -> u16 {
        8000
    }

    pub fn default_headless_path() -> PathBuf {
        PathBuf::from("/opt/ghidra/support/analyzeHeadless")
    }

    pub fn default_scratch_root() -> PathBuf {
        std::env::temp_dir().join("spectrace")
    }

    pub fn default_project_name() -> String {
        "spectrace".to_string()
    }

    pub fn default_decompile_timeout_secs() -> u64 {
        300
    }

    pub fn default_kill_grace_secs() -> u64 {
        5
    }

    pub fn default_max_payload_bytes() -> u64 {
        100 * 1024 * 1024
    }

    pub fn default_max_concurrent() -> usize {
        2
    }

    pub fn default_queue_wait_secs() -> u64 {
        30
    }

    pub fn default_provider() -> String {
        "openai".to_string()
    }

    pub fn default_model() -> String {
        "gpt-4o".to_string()
    }

    pub fn default_api_key_env() -> String {
        "OPENAI_API_KEY".to_string()
    }

    pub fn default_max_tokens() -> u32 {
        4096
    }

    pub fn default_temperature() -> f32 {
        0.2
    }

    pub fn default_request_timeout_secs() -> u64 {
        120
    }

    pub fn default_max_attempts() -> u32 {
        3
    }

    pub fn default_backoff_ms() -> u64 {
        500
    }

    pub fn default_rate_limit_per_minute() -> u32 {
        50
    }

    pub fn default_burst_per_second() -> u32 {
        5
    }

    pub fn default_compliant_threshold() -> f64 {
        0.9
    }

    pub fn default_partial_threshold() -> f64 {
        0.5
    }

    pub fn default_blocking_severity() -> Severity {
        Severity::High
    }

    pub fn default_log_level() -> String {
        "info".to_string()
    }
}
