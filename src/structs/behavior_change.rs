use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BehaviorChange {
    pub change: String,
    pub old_behavior: String,
    pub new_behavior: String,
    #[serde(default)]
    pub security_impact: Option<String>,
}
