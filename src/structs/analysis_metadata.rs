use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::enums::analysis_mode::AnalysisMode;
use crate::enums::content_anomaly::ContentAnomaly;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisMetadata {
    #[serde(default)]
    pub mode: AnalysisMode,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub old_length: usize,
    #[serde(default)]
    pub new_length: usize,
    #[serde(default)]
    pub total_changes: usize,
    /// Set when the inputs were byte-identical and the service was not consulted.
    #[serde(default)]
    pub identical_input: bool,
    #[serde(default)]
    pub content_anomaly: Option<ContentAnomaly>,
    #[serde(default)]
    pub firmware_type: Option<String>,
    #[serde(default)]
    pub analysis_depth: Option<String>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}
