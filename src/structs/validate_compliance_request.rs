use serde::{Deserialize, Serialize};
use crate::structs::code_analysis_result::CodeAnalysisResult;
use crate::structs::spec_analysis_result::SpecAnalysisResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateComplianceRequest {
    pub code_analysis: CodeAnalysisResult,
    pub spec_analysis: SpecAnalysisResult,
}
