use serde::{Deserialize, Serialize};
use crate::enums::severity::Severity;
use crate::structs::analysis_metadata::AnalysisMetadata;
use crate::structs::change_record::ChangeRecord;
use crate::structs::security_finding::SecurityFinding;

/// Code-mode comparison result. Never mutated after the analyzer returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysisResult {
    pub differences: Vec<ChangeRecord>,
    #[serde(default)]
    pub security_findings: Vec<SecurityFinding>,
    pub risk_assessment: Severity,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub major_changes: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub analysis_metadata: AnalysisMetadata,
}
