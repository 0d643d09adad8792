use serde::Deserialize;
use crate::enums::finding_category::FindingCategory;
use crate::enums::severity::Severity;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireFinding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}
