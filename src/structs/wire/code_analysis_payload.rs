use serde::Deserialize;
use crate::enums::severity::Severity;
use crate::structs::wire::code_difference::CodeDifference;
use crate::structs::wire::wire_finding::WireFinding;

/// Exact reply shape demanded from the service in code mode.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeAnalysisPayload {
    pub differences: Vec<CodeDifference>,
    pub security_findings: Vec<WireFinding>,
    pub risk_assessment: Severity,
    pub summary: String,
    pub major_changes: Vec<String>,
    pub recommendations: Vec<String>,
}
