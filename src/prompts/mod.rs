pub mod code_analysis_prompt;
pub mod compliance_prompt;
pub mod spec_analysis_prompt;
