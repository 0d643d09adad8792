use serde::{Deserialize, Serialize};
use crate::enums::locator::Locator;

/// Resolved pointer into one of the two correlated result sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordReference {
    /// `C<n>` for code records, `S<n>` for spec records, 1-based.
    pub id: String,
    /// Position in the corresponding `differences` list.
    pub index: usize,
    pub locator: Locator,
}
