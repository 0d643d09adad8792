use serde::{Deserialize, Serialize};
use crate::errors::SpectraceError;

/// Body of every successful response: the payload's fields flattened next to `success: true`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub kind: String,
    pub message: String,
    pub retryable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub success: bool,
    pub error: ApiErrorBody,
}

impl From<&SpectraceError> for ApiFailure {
    fn from(error: &SpectraceError) -> Self {
        Self {
            success: false,
            error: ApiErrorBody {
                kind: error.kind().to_string(),
                message: error.user_message(),
                retryable: error.is_retryable(),
            },
        }
    }
}
