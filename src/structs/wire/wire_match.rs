use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireMatch {
    pub code_ref: String,
    pub spec_ref: String,
    pub description: String,
}
