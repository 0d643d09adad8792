use serde::{Deserialize, Serialize};

/// Audit flag for comparisons where one or both artifacts were empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentAnomaly {
    OldEmpty,
    NewEmpty,
    BothEmpty,
}

impl ContentAnomaly {
    pub fn detect(old: &str, new: &str) -> Option<Self> {
        match (old.trim().is_empty(), new.trim().is_empty()) {
            (true, true) => Some(ContentAnomaly::BothEmpty),
            (true, false) => Some(ContentAnomaly::OldEmpty),
            (false, true) => Some(ContentAnomaly::NewEmpty),
            (false, false) => None,
        }
    }
}
