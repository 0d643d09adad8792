use serde::{Deserialize, Serialize};
use crate::enums::severity::Severity;
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ComplianceConfig {
    #[serde(default = "ConfigHelper::default_compliant_threshold")]
    pub compliant_threshold: f64,

    #[serde(default = "ConfigHelper::default_partial_threshold")]
    pub partial_threshold: f64,

    /// Unmatched records at or above this severity block a `compliant` status.
    #[serde(default = "ConfigHelper::default_blocking_severity")]
    pub blocking_severity: Severity,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            compliant_threshold: ConfigHelper::default_compliant_threshold(),
            partial_threshold: ConfigHelper::default_partial_threshold(),
            blocking_severity: ConfigHelper::default_blocking_severity(),
        }
    }
}
