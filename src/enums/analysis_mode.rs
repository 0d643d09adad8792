use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Code,
    Spec,
}

impl AnalysisMode {
    /// Name of the output contract, used in contract-violation reports.
    pub fn contract_name(&self) -> &'static str {
        match self {
            AnalysisMode::Code => "code_analysis",
            AnalysisMode::Spec => "spec_analysis",
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            AnalysisMode::Code => "code comparison",
            AnalysisMode::Spec => "specification comparison",
        }
    }
}
