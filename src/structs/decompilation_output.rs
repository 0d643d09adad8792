use serde::{Deserialize, Serialize};
use crate::structs::binary_metadata::BinaryMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompilationOutput {
    pub assembly_code: String,
    pub decompiled_code: String,
    pub metadata: BinaryMetadata,
}

impl DecompilationOutput {
    /// Text handed to code-mode analysis: decompiled source when there is any, else the listing.
    pub fn analyzable_text(&self) -> &str {
        if self.decompiled_code.trim().is_empty() {
            &self.assembly_code
        } else {
            &self.decompiled_code
        }
    }
}
