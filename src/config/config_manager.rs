use std::fs;
use std::path::{Path, PathBuf};
use crate::config::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::errors::{SpectraceError, SpectraceResult};
use crate::structs::config::config::Config;
use crate::structs::validation_result::ValidationResult;

const SUPPORTED_PROVIDERS: &[&str] = &["openai", "anthropic"];

pub struct ConfigManager;

impl ConfigManager {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// The file `load` reads: the explicit path, else the home-directory file when present.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        }
    }

    /// An explicit path must exist; the home-directory location is optional.
    pub fn load(explicit: Option<&Path>) -> SpectraceResult<Config> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(SpectraceError::config_error(
                    &format!("Configuration file not found: {}", path.display()),
                    None,
                    Some("Run 'spectrace init' to create one"),
                ));
            }
        }

        match Self::resolve_path(explicit) {
            Some(path) => Self::load_file(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_file(path: &Path) -> SpectraceResult<Config> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> SpectraceResult<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn create_sample_config(target: Option<&Path>) -> SpectraceResult<PathBuf> {
        let config_file_path = match target {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or_else(|| {
                SpectraceError::config_error("Could not determine the home directory", None, Some("Pass --config <path>"))
            })?,
        };

        if config_file_path.exists() {
            return Err(SpectraceError::config_error(
                &format!("Configuration file already exists: {}", config_file_path.display()),
                None,
                Some("Edit the existing file or remove it first"),
            ));
        }

        if let Some(parent) = config_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_file_path, SAMPLE_CONFIG)?;
        log::info!("✅ Created sample config at: {}", config_file_path.display());
        Ok(config_file_path)
    }

    pub fn validate(config: &Config) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let decompiler = &config.decompiler;
        if !decompiler.headless_path.is_file() {
            errors.push(format!(
                "Decompiler executable not found: {}",
                decompiler.headless_path.display()
            ));
        }
        match &decompiler.java_home {
            Some(java_home) if !java_home.is_dir() => {
                errors.push(format!("java_home is not a directory: {}", java_home.display()));
            }
            None => warnings.push("decompiler.java_home is not set; the tool will pick its own JDK".to_string()),
            _ => {}
        }
        if decompiler.timeout_secs == 0 {
            errors.push("decompiler.timeout_secs must be greater than zero".to_string());
        }
        if decompiler.max_payload_bytes == 0 {
            errors.push("decompiler.max_payload_bytes must be greater than zero".to_string());
        }
        if decompiler.max_concurrent == 0 {
            errors.push("decompiler.max_concurrent must be greater than zero".to_string());
        }
        if decompiler.kill_grace_secs == 0 {
            warnings.push("decompiler.kill_grace_secs is zero; output of killed jobs may be truncated".to_string());
        }

        let ai = &config.ai;
        if !SUPPORTED_PROVIDERS.contains(&ai.provider.as_str()) {
            errors.push(format!(
                "Unknown ai.provider '{}', expected one of: {}",
                ai.provider,
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }
        if std::env::var_os(&ai.api_key_env).is_none() {
            errors.push(format!("Environment variable {} is not set", ai.api_key_env));
        }
        if ai.max_attempts == 0 {
            errors.push("ai.max_attempts must be at least 1".to_string());
        }
        if ai.rate_limit_per_minute == 0 || ai.burst_per_second == 0 {
            errors.push("ai rate limits must be greater than zero".to_string());
        }

        errors.extend(Self::threshold_errors(config));

        ValidationResult::from_findings(errors, warnings)
    }

    fn threshold_errors(config: &Config) -> Vec<String> {
        let compliance = &config.compliance;
        let mut errors = Vec::new();

        for (name, value) in [
            ("compliant_threshold", compliance.compliant_threshold),
            ("partial_threshold", compliance.partial_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("compliance.{} must be within [0, 1], got {}", name, value));
            }
        }
        if compliance.partial_threshold > compliance.compliant_threshold {
            errors.push(format!(
                "compliance.partial_threshold ({}) is above compliant_threshold ({})",
                compliance.partial_threshold, compliance.compliant_threshold
            ));
        }

        errors
    }

    /// Fatal startup check: any validation error becomes a `ConfigurationError`.
    pub fn ensure_valid(config: &Config) -> SpectraceResult<ValidationResult> {
        let result = Self::validate(config);
        result.log_summary();

        if result.is_valid {
            Ok(result)
        } else {
            Err(SpectraceError::config_error(
                &result.errors.join("; "),
                None,
                Some("Run 'spectrace validate' after fixing the configuration"),
            ))
        }
    }
}

const SAMPLE_CONFIG: &str = r#"# Spectrace configuration

[server]
host = "127.0.0.1"
port = 8000

[decompiler]
# Headless analyzer launcher shipped with the decompiler distribution
headless_path = "/opt/ghidra/support/analyzeHeadless"
# JDK used by the decompiler; passed explicitly to the subprocess
# java_home = "/usr/lib/jvm/java-17-openjdk"
# Per-job workspaces are created under this directory and removed afterwards
scratch_root = "/tmp/spectrace"
project_name = "spectrace"
timeout_secs = 300
kill_grace_secs = 5
# 100 MB
max_payload_bytes = 104857600
# Decompiler processes are heavy; requests beyond this wait up to queue_wait_secs
max_concurrent = 2
queue_wait_secs = 30

[ai]
# "openai" or "anthropic"
provider = "openai"
model = "gpt-4o"
# base_url = "https://api.openai.com/v1"
api_key_env = "OPENAI_API_KEY"
max_tokens = 4096
temperature = 0.2
request_timeout_secs = 120
# Transport failures only; malformed answers are never retried
max_attempts = 3
backoff_ms = 500
rate_limit_per_minute = 50
burst_per_second = 5

[compliance]
compliant_threshold = 0.9
partial_threshold = 0.5
# Unmatched findings at or above this level prevent a "compliant" status
blocking_severity = "high"

[logging]
# Overridden by RUST_LOG when set
level = "info"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::severity::Severity;

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let config = ConfigManager::parse("[decompiler]\ntimeout_secs = 60\n").unwrap();
        assert_eq!(config.decompiler.timeout_secs, 60);
        assert_eq!(config.decompiler.max_concurrent, 2);
        assert_eq!(config.compliance.compliant_threshold, 0.9);
        assert_eq!(config.compliance.blocking_severity, Severity::High);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn sample_config_parses() {
        let config = ConfigManager::parse(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.ai.provider, "openai");
        assert_eq!(config.decompiler.max_payload_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = ConfigManager::parse("[decompiler\n").unwrap_err();
        assert_eq!(err.kind(), "configuration_error");
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut config = Config::default();
        config.compliance.partial_threshold = 0.95;
        config.compliance.compliant_threshold = 0.9;
        let result = ConfigManager::validate(&config);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("partial_threshold")));
    }

    #[test]
    fn missing_decompiler_is_reported() {
        let mut config = Config::default();
        config.decompiler.headless_path = PathBuf::from("/nonexistent/analyzeHeadless");
        let result = ConfigManager::validate(&config);
        assert!(result.errors.iter().any(|e| e.contains("Decompiler executable not found")));
    }

    #[test]
    fn explicit_path_is_resolved_and_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrace.toml");
        assert_eq!(ConfigManager::resolve_path(Some(&path)), Some(path.clone()));
        assert_eq!(ConfigManager::load(Some(&path)).unwrap_err().kind(), "configuration_error");

        fs::write(&path, "[server]\nport = 9100\n").unwrap();
        assert_eq!(ConfigManager::load(Some(&path)).unwrap().server.port, 9100);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        ConfigManager::create_sample_config(Some(&path)).unwrap();
        assert!(path.exists());
        let err = ConfigManager::create_sample_config(Some(&path)).unwrap_err();
        assert_eq!(err.kind(), "configuration_error");
    }
}
