use serde::{Deserialize, Serialize};
use crate::enums::severity::Severity;
use crate::structs::analysis_metadata::AnalysisMetadata;
use crate::structs::behavior_change::BehaviorChange;
use crate::structs::change_record::ChangeRecord;
use crate::structs::spec_feature::SpecFeature;

/// Spec-mode comparison result. Locators are always section names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecAnalysisResult {
    pub differences: Vec<ChangeRecord>,
    #[serde(default)]
    pub new_features: Vec<SpecFeature>,
    #[serde(default)]
    pub removed_features: Vec<SpecFeature>,
    #[serde(default)]
    pub behavioral_changes: Vec<BehaviorChange>,
    pub risk_level: Severity,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub major_changes: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub analysis_metadata: AnalysisMetadata,
}
