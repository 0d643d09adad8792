use serde::Deserialize;
use crate::enums::severity::Severity;
use crate::structs::behavior_change::BehaviorChange;
use crate::structs::spec_feature::SpecFeature;
use crate::structs::wire::spec_difference::SpecDifference;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecAnalysisPayload {
    pub differences: Vec<SpecDifference>,
    pub new_features: Vec<SpecFeature>,
    pub removed_features: Vec<SpecFeature>,
    pub behavioral_changes: Vec<BehaviorChange>,
    pub risk_level: Severity,
    pub summary: String,
    pub major_changes: Vec<String>,
    pub recommendations: Vec<String>,
}
