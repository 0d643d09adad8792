use serde::Deserialize;
use crate::enums::change_kind::ChangeKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecDifference {
    pub section: String,
    pub change_type: ChangeKind,
    #[serde(default)]
    pub old_content: Option<String>,
    #[serde(default)]
    pub new_content: Option<String>,
    pub description: String,
}
