//! Reply shapes the reasoning service must produce, decoded strictly.

pub mod code_analysis_payload;
pub mod code_difference;
pub mod correlation_payload;
pub mod spec_analysis_payload;
pub mod spec_difference;
pub mod wire_finding;
pub mod wire_match;
pub mod wire_mismatch;
