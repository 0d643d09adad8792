use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AiProviderError {
    #[error("Network Error: {0}")]
    NetworkError(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("Server Error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("API Error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Authentication Error: {0}")]
    AuthenticationError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
}

impl AiProviderError {
    /// Transport-class failures are worth retrying; everything else would reproduce.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AiProviderError::NetworkError(_)
                | AiProviderError::Timeout(_)
                | AiProviderError::RateLimited(_)
                | AiProviderError::ServerError { .. }
        )
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            AiProviderError::RateLimited(_) => Some(429),
            AiProviderError::ServerError { status, .. } => Some(*status),
            AiProviderError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => AiProviderError::AuthenticationError(body),
            429 => AiProviderError::RateLimited(body),
            500..=599 => AiProviderError::ServerError { status, message: body },
            _ => AiProviderError::ApiError { status, message: body },
        }
    }
}
