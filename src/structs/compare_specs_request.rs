use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareSpecsRequest {
    pub old_spec: String,
    pub new_spec: String,
}
