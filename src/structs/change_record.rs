use serde::{Deserialize, Serialize};
use crate::enums::change_kind::ChangeKind;
use crate::enums::locator::Locator;

/// One detected difference between an old and a new artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub locator: Locator,
    pub change_type: ChangeKind,
    #[serde(default)]
    pub old_content: Option<String>,
    #[serde(default)]
    pub new_content: Option<String>,
    pub description: String,
}

impl ChangeRecord {
    pub fn has_content(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|c| !c.trim().is_empty());
        present(&self.old_content) || present(&self.new_content)
    }

    /// Returns the first broken invariant, if any.
    pub fn check(&self) -> Result<(), String> {
        if !self.locator.is_valid() {
            return Err(format!("invalid locator: {}", self.locator));
        }
        if !self.has_content() {
            return Err(format!(
                "change at {} has neither old_content nor new_content",
                self.locator
            ));
        }
        Ok(())
    }
}
