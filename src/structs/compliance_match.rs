use serde::{Deserialize, Serialize};
use crate::structs::record_reference::RecordReference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMatch {
    pub description: String,
    pub code_reference: RecordReference,
    pub spec_reference: RecordReference,
}
