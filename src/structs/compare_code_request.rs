use serde::{Deserialize, Serialize};

fn default_analysis_depth() -> String {
    "detailed".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareCodeRequest {
    pub old_code: String,
    pub new_code: String,
    #[serde(default)]
    pub firmware_type: Option<String>,
    #[serde(default = "default_analysis_depth")]
    pub analysis_depth: String,
}

impl CompareCodeRequest {
    pub fn new(old_code: String, new_code: String, firmware_type: Option<String>) -> Self {
        Self {
            old_code,
            new_code,
            firmware_type,
            analysis_depth: default_analysis_depth(),
        }
    }
}
