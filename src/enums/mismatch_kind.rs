use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// A code change with no counterpart in the specification.
    MissingInSpec,
    /// A specification change with no counterpart in the code.
    MissingInCode,
    /// Both sides changed, but they disagree.
    Inconsistent,
    /// Stands in for a correlation entry whose references did not resolve.
    Unresolved,
}

impl MismatchKind {
    pub fn needs_code_reference(&self) -> bool {
        matches!(self, MismatchKind::MissingInSpec | MismatchKind::Inconsistent)
    }

    pub fn needs_spec_reference(&self) -> bool {
        matches!(self, MismatchKind::MissingInCode | MismatchKind::Inconsistent)
    }
}
