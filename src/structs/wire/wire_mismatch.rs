use serde::Deserialize;
use crate::enums::mismatch_kind::MismatchKind;
use crate::enums::severity::Severity;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireMismatch {
    #[serde(rename = "type")]
    pub kind: MismatchKind,
    #[serde(default)]
    pub code_ref: Option<String>,
    #[serde(default)]
    pub spec_ref: Option<String>,
    pub description: String,
    pub severity: Severity,
}
