use std::fmt;
use std::error::Error as StdError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpectraceError {
    // Decompilation errors
    PayloadTooLarge {
        size: u64,
        limit: u64,
    },
    UnsupportedFormat {
        filename: String,
        reason: String,
    },
    DecompilationTimeout {
        filename: String,
        timeout_secs: u64,
    },
    ToolFailure {
        stage: String,
        exit_code: Option<i32>,
        reason: String,
    },
    EmptyResult {
        filename: String,
    },

    // Reasoning service errors
    AnalysisContractViolation {
        contract: String,
        reason: String,
    },
    UpstreamTransportError {
        operation: String,
        status_code: Option<u16>,
        attempts: u32,
        reason: String,
        retryable: bool,
    },

    // Correlation errors (logged and dropped, never surfaced as a failure response)
    UnresolvedReference {
        reference: String,
        side: String,
    },

    // Startup errors
    ConfigurationError {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },

    // Request errors
    InvalidInput {
        field: String,
        reason: String,
    },
    Overloaded {
        resource: String,
        retry_after_secs: u64,
    },

    // System errors
    SystemError {
        operation: String,
        reason: String,
    },
}

impl SpectraceError {
    pub fn config_error(message: &str, field: Option<&str>, suggestion: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.map(|s| s.to_string()),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    pub fn tool_failure(stage: &str, exit_code: Option<i32>, reason: &str) -> Self {
        Self::ToolFailure {
            stage: stage.to_string(),
            exit_code,
            reason: reason.to_string(),
        }
    }

    pub fn contract_violation(contract: &str, reason: &str) -> Self {
        Self::AnalysisContractViolation {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_input(field: &str, reason: &str) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unresolved_reference(reference: &str, side: &str) -> Self {
        Self::UnresolvedReference {
            reference: reference.to_string(),
            side: side.to_string(),
        }
    }

    pub fn system_error(operation: &str, reason: &str) -> Self {
        Self::SystemError {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable identifier, used as `error.kind` on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::DecompilationTimeout { .. } => "decompilation_timeout",
            Self::ToolFailure { .. } => "tool_failure",
            Self::EmptyResult { .. } => "empty_result",
            Self::AnalysisContractViolation { .. } => "analysis_contract_violation",
            Self::UpstreamTransportError { .. } => "upstream_transport_error",
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::ConfigurationError { .. } => "configuration_error",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Overloaded { .. } => "overloaded",
            Self::SystemError { .. } => "system_error",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamTransportError { retryable, .. } => *retryable,
            Self::Overloaded { .. } => true,
            Self::DecompilationTimeout { .. } => false,
            Self::ToolFailure { .. } => false,
            Self::AnalysisContractViolation { .. } => false,
            _ => false,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::PayloadTooLarge { .. } => 413,
            Self::UnsupportedFormat { .. } => 422,
            Self::EmptyResult { .. } => 422,
            Self::InvalidInput { .. } => 422,
            Self::DecompilationTimeout { .. } => 504,
            Self::ToolFailure { .. } => 502,
            Self::AnalysisContractViolation { .. } => 502,
            Self::UpstreamTransportError { .. } => 503,
            Self::Overloaded { .. } => 503,
            Self::UnresolvedReference { .. } => 500,
            Self::ConfigurationError { .. } => 500,
            Self::SystemError { .. } => 500,
        }
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Overloaded { retry_after_secs, .. } => Some(*retry_after_secs),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::PayloadTooLarge { size, limit } => {
                format!("Binary payload of {} bytes exceeds the {} byte limit", size, limit)
            }
            Self::UnsupportedFormat { filename, reason } => {
                format!("Your binary '{}' is not a format the decompiler can import: {}", filename, reason)
            }
            Self::DecompilationTimeout { filename, timeout_secs } => {
                format!(
                    "Decompilation of '{}' did not finish within {}s and was terminated; try a smaller binary",
                    filename, timeout_secs
                )
            }
            Self::ToolFailure { stage, exit_code, reason } => {
                let mut msg = format!("The decompiler failed during {}", stage);
                if let Some(code) = exit_code {
                    msg.push_str(&format!(" (exit code {})", code));
                }
                msg.push_str(&format!(": {}", reason));
                msg
            }
            Self::EmptyResult { filename } => {
                format!("The decompiler ran on '{}' but produced no analyzable content", filename)
            }
            Self::AnalysisContractViolation { contract, reason } => {
                format!(
                    "The analysis model's output didn't fit the expected {} shape: {}",
                    contract, reason
                )
            }
            Self::UpstreamTransportError { operation, status_code, attempts, reason, .. } => {
                let mut msg = format!("The analysis service is unavailable during {}: {}", operation, reason);
                if let Some(code) = status_code {
                    msg.push_str(&format!(" (status {})", code));
                }
                msg.push_str(&format!(" after {} attempt(s)", attempts));
                msg
            }
            Self::UnresolvedReference { reference, side } => {
                format!("Correlation referenced unknown {} record '{}'", side, reference)
            }
            Self::ConfigurationError { message, field, suggestion } => {
                let mut msg = format!("Configuration Error: {}", message);
                if let Some(field) = field {
                    msg.push_str(&format!(" (field: {})", field));
                }
                if let Some(suggestion) = suggestion {
                    msg.push_str(&format!("; suggestion: {}", suggestion));
                }
                msg
            }
            Self::InvalidInput { field, reason } => {
                format!("Invalid input for '{}': {}", field, reason)
            }
            Self::Overloaded { resource, retry_after_secs } => {
                format!(
                    "The {} is at capacity; retry in about {}s",
                    resource, retry_after_secs
                )
            }
            Self::SystemError { operation, reason } => {
                format!("System error during {}: {}", operation, reason)
            }
        }
    }
}

impl fmt::Display for SpectraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl StdError for SpectraceError {}

/// Result type alias for spectrace operations
pub type SpectraceResult<T> = Result<T, SpectraceError>;

/// Convert from standard library errors
impl From<std::io::Error> for SpectraceError {
    fn from(error: std::io::Error) -> Self {
        SpectraceError::SystemError {
            operation: "I/O operation".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for SpectraceError {
    fn from(error: toml::de::Error) -> Self {
        SpectraceError::ConfigurationError {
            message: error.message().to_string(),
            field: None,
            suggestion: Some("Check the TOML syntax of the configuration file".to_string()),
        }
    }
}
