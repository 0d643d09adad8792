use serde::{Deserialize, Serialize};
use crate::enums::mismatch_kind::MismatchKind;
use crate::enums::severity::Severity;
use crate::structs::record_reference::RecordReference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMismatch {
    #[serde(rename = "type")]
    pub kind: MismatchKind,
    pub description: String,
    pub code_reference: Option<RecordReference>,
    pub spec_reference: Option<RecordReference>,
    pub severity: Severity,
    /// True when added locally for a record the service left uncovered.
    #[serde(default)]
    pub synthesized: bool,
}
