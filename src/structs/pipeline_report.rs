use serde::{Deserialize, Serialize};
use crate::structs::binary_metadata::BinaryMetadata;
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::compliance_report::ComplianceReport;
use crate::structs::spec_analysis_result::SpecAnalysisResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub code_analysis: CodeAnalysisResult,
    pub spec_analysis: SpecAnalysisResult,
    pub compliance: ComplianceReport,
    #[serde(default)]
    pub old_binary: Option<BinaryMetadata>,
    #[serde(default)]
    pub new_binary: Option<BinaryMetadata>,
    pub duration_ms: u64,
}
