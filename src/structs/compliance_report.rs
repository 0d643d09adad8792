use serde::{Deserialize, Serialize};
use crate::enums::compliance_status::ComplianceStatus;
use crate::structs::compliance_match::ComplianceMatch;
use crate::structs::compliance_metadata::ComplianceMetadata;
use crate::structs::compliance_mismatch::ComplianceMismatch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub compliance_status: ComplianceStatus,
    pub compliance_score: f64,
    pub matches: Vec<ComplianceMatch>,
    pub mismatches: Vec<ComplianceMismatch>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub metadata: ComplianceMetadata,
}
