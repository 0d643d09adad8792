pub mod ai_provider_error;
pub mod analysis_mode;
pub mod binary_format;
pub mod change_kind;
pub mod code_artifact;
pub mod commands;
pub mod compliance_status;
pub mod content_anomaly;
pub mod finding_category;
pub mod job_status;
pub mod locator;
pub mod mismatch_kind;
pub mod severity;
