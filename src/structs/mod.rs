pub mod ai;
pub mod analysis_metadata;
pub mod api_response;
pub mod behavior_change;
pub mod binary_metadata;
pub mod change_record;
pub mod cli;
pub mod code_analysis_result;
pub mod compare_code_request;
pub mod compare_specs_request;
pub mod compliance_match;
pub mod compliance_metadata;
pub mod compliance_mismatch;
pub mod compliance_report;
pub mod config;
pub mod decompilation_job;
pub mod decompilation_output;
pub mod pipeline_report;
pub mod pipeline_request;
pub mod record_reference;
pub mod security_finding;
pub mod spec_analysis_result;
pub mod spec_feature;
pub mod validate_compliance_request;
pub mod validation_result;
pub mod wire;
