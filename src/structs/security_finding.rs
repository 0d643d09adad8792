use serde::{Deserialize, Serialize};
use crate::enums::finding_category::FindingCategory;
use crate::enums::severity::Severity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityFinding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
}
