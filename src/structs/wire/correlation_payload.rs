use serde::Deserialize;
use crate::structs::wire::wire_match::WireMatch;
use crate::structs::wire::wire_mismatch::WireMismatch;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelationPayload {
    pub matches: Vec<WireMatch>,
    pub mismatches: Vec<WireMismatch>,
    pub summary: String,
    pub recommendations: Vec<String>,
}
